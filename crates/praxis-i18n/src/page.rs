//! Page-scoped content lookups.
//!
//! A [`PageContent`] binds a [`FallbackChain`] to one page prefix so page
//! code asks for `title` instead of `appointments.fees.title`.

use crate::fallback::{FallbackChain, Shape};
use crate::tree::{ContentNode, ContentTree, join_path};

/// Page-scoped view over a fallback chain.
///
/// Pages ask for keys relative to their own section (`fees.title` on the
/// appointments page) and always get something renderable back.
///
/// ```
/// use praxis_i18n::{FallbackChain, PageContent, defaults};
///
/// let chain = FallbackChain::for_page(None, None, defaults::english());
/// let page = PageContent::new(&chain, "appointments");
/// assert_eq!(page.text("fees.title"), "Fees");
/// assert!(!page.texts("fees.items").is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct PageContent<'c, 'a> {
    chain: &'c FallbackChain<'a>,
    prefix: String,
}

impl<'c, 'a> PageContent<'c, 'a> {
    #[must_use]
    pub fn new(chain: &'c FallbackChain<'a>, prefix: impl Into<String>) -> Self {
        Self {
            chain,
            prefix: prefix.into(),
        }
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Absolute dotted path for a page-relative key.
    #[must_use]
    pub fn path(&self, key: &str) -> String {
        join_path(&self.prefix, key)
    }

    /// Text for `key`; falls back to the absolute path when nothing holds it.
    #[must_use]
    pub fn text(&self, key: &str) -> String {
        let path = self.path(key);
        self.chain.text(&path).to_string()
    }

    #[must_use]
    pub fn list(&self, key: &str) -> &'a [ContentNode] {
        self.chain.list(&self.path(key))
    }

    #[must_use]
    pub fn texts(&self, key: &str) -> Vec<&'a str> {
        self.chain.texts(&self.path(key))
    }

    #[must_use]
    pub fn section(&self, key: &str) -> &'a ContentTree {
        self.chain.section(&self.path(key))
    }

    /// Whether any tier holds text for `key`.
    #[must_use]
    pub fn has_text(&self, key: &str) -> bool {
        self.chain.resolve(&self.path(key), Shape::Text).is_some()
    }

    /// A nested view, e.g. `appointments` → `appointments.fees`.
    #[must_use]
    pub fn child(&self, key: &str) -> PageContent<'c, 'a> {
        PageContent {
            chain: self.chain,
            prefix: self.path(key),
        }
    }
}
