//! Leaf classification.
//!
//! Text leaves follow a fixed rule order:
//!
//! 1. candidate absent → `Missing`
//! 2. candidate not text → `TypeError`
//! 3. candidate `""` → `Empty`
//! 4. candidate carries a pending marker → `Placeholder`
//! 5. otherwise → `Success`
//!
//! Lists are compared as a whole and scalars by presence; see
//! [`classify`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tree::ContentNode;

/// Substrings marking a value as a deliberate stand-in for a pending
/// translation.
pub const PLACEHOLDER_MARKERS: [&str; 2] = ["[missing-translation:", "[needs-translation:"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FindingKind {
    Success,
    Missing,
    Empty,
    Placeholder,
    TypeError,
}

impl FindingKind {
    pub const ALL: [Self; 5] = [
        Self::Success,
        Self::Missing,
        Self::Empty,
        Self::Placeholder,
        Self::TypeError,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Missing => "MISSING",
            Self::Empty => "EMPTY",
            Self::Placeholder => "PLACEHOLDER",
            Self::TypeError => "TYPE_ERROR",
        }
    }

    #[must_use]
    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[must_use]
pub fn is_placeholder(text: &str) -> bool {
    PLACEHOLDER_MARKERS
        .iter()
        .any(|marker| text.contains(marker))
}

/// Classify a candidate against a reference leaf.
///
/// Returns `None` when the reference is a subtree: subtrees are walked by
/// the differ, never classified.
#[must_use]
pub fn classify(reference: &ContentNode, candidate: Option<&ContentNode>) -> Option<FindingKind> {
    match reference {
        ContentNode::Tree(_) => None,
        ContentNode::Text(_) => Some(classify_text(candidate)),
        ContentNode::List(items) => Some(classify_list(items, candidate)),
        ContentNode::Scalar(_) => Some(classify_scalar(candidate)),
    }
}

/// Rules 1-5 for a text reference.
#[must_use]
pub fn classify_text(candidate: Option<&ContentNode>) -> FindingKind {
    match candidate {
        None => FindingKind::Missing,
        Some(ContentNode::Text(text)) if text.is_empty() => FindingKind::Empty,
        Some(ContentNode::Text(text)) if is_placeholder(text) => FindingKind::Placeholder,
        Some(ContentNode::Text(_)) => FindingKind::Success,
        Some(_) => FindingKind::TypeError,
    }
}

/// Lists are atomic: presence, shape and length are checked, and a pending
/// marker in any text item marks the whole list as a placeholder.
#[must_use]
pub fn classify_list(reference: &[ContentNode], candidate: Option<&ContentNode>) -> FindingKind {
    let items = match candidate {
        None => return FindingKind::Missing,
        Some(ContentNode::List(items)) => items,
        Some(_) => return FindingKind::TypeError,
    };

    if items.is_empty() && !reference.is_empty() {
        return FindingKind::Empty;
    }
    if items.len() != reference.len() {
        return FindingKind::TypeError;
    }
    if items
        .iter()
        .filter_map(ContentNode::as_text)
        .any(is_placeholder)
    {
        return FindingKind::Placeholder;
    }
    FindingKind::Success
}

/// Non-text scalars in the reference only need a scalar counterpart.
#[must_use]
pub fn classify_scalar(candidate: Option<&ContentNode>) -> FindingKind {
    match candidate {
        None => FindingKind::Missing,
        Some(ContentNode::Scalar(_)) => FindingKind::Success,
        Some(_) => FindingKind::TypeError,
    }
}
