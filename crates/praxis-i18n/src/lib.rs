#![forbid(unsafe_code)]

//! Localized content for the Praxis site.
//!
//! Two concerns live here:
//!
//! - **Rendering**: pages resolve display text through a
//!   [`FallbackChain`] (active locale, bundled default, shared literal
//!   defaults) and always get something renderable back, however partial
//!   the locale tree is.
//! - **Validation**: a reference tree is diffed against a target tree, every
//!   leaf is classified, findings are graded per page category, and the
//!   result is assembled into a serializable [`Report`].
//!
//! Both sides are pure computations over in-memory trees. Loading files and
//! persisting reports is left to the caller (see the `doctor_praxis` tool).

pub mod classify;
pub mod coverage;
pub mod defaults;
pub mod diff;
pub mod error;
pub mod fallback;
pub mod page;
pub mod path;
pub mod report;
pub mod tree;

pub use classify::{FindingKind, PLACEHOLDER_MARKERS, classify, is_placeholder};
pub use coverage::{CategoryIndex, CoverageRecord, Grade, aggregate};
pub use diff::{Finding, diff};
pub use error::{I18nError, Result};
pub use fallback::{FallbackChain, Resolved, Shape, Tier};
pub use page::PageContent;
pub use path::resolve;
pub use report::{FailurePolicy, Report, ReportBuilder, Summary, render_summary};
pub use tree::{ContentNode, ContentTree, MAX_TREE_DEPTH, SkippedKey};
