//! Shared default content: the tail of every page's fallback chain.
//!
//! All pages borrow the same tree instead of carrying their own literal
//! copies, so the defaults cannot drift apart page by page.

use std::sync::OnceLock;

use crate::tree::ContentTree;

/// Locale tag of the bundled defaults.
pub const DEFAULT_LOCALE: &str = "en";

const ENGLISH_SOURCE: &str = include_str!("../content/en.json");

static ENGLISH: OnceLock<ContentTree> = OnceLock::new();

/// The bundled English content, parsed once per process.
///
/// The bundled document is validated by this crate's tests. Should it ever
/// fail to parse at runtime the error is logged and an empty tree is used,
/// which the fallback chain handles without failing.
pub fn english() -> &'static ContentTree {
    ENGLISH.get_or_init(|| {
        ContentTree::from_json_str(ENGLISH_SOURCE).unwrap_or_else(|error| {
            tracing::error!(%error, "bundled default content failed to load");
            ContentTree::new()
        })
    })
}

/// Raw JSON of the bundled defaults, for tools that persist or diff it.
#[must_use]
pub fn english_source() -> &'static str {
    ENGLISH_SOURCE
}

#[cfg(test)]
mod tests {
    use super::{english, english_source};
    use crate::tree::{ContentNode, ContentTree};

    #[test]
    fn bundled_defaults_parse() {
        let parsed = ContentTree::from_json_str(english_source()).expect("bundled en.json");
        assert!(!parsed.is_empty());
        assert_eq!(english(), &parsed);
    }

    #[test]
    fn bundled_defaults_cover_every_page_section() {
        let tree = english();
        for section in [
            "navigation",
            "home",
            "about",
            "services",
            "appointments",
            "contact",
            "footer",
        ] {
            assert!(
                tree.get(section).and_then(ContentNode::as_tree).is_some(),
                "missing section {section}"
            );
        }
        assert_eq!(
            tree.lookup("appointments.fees.title")
                .and_then(ContentNode::as_text),
            Some("Fees")
        );
    }

    #[test]
    fn bundled_defaults_have_no_empty_text() {
        let tree = english();
        for path in tree.leaf_paths() {
            if let Some(text) = tree.lookup(&path).and_then(ContentNode::as_text) {
                assert!(!text.trim().is_empty(), "empty default at {path}");
            }
        }
    }
}
