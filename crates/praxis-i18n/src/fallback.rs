//! Ordered fallback across candidate content trees.
//!
//! # Invariants
//!
//! 1. **Non-empty chain**: a chain is always built with a tail tree, so it
//!    has at least one tier.
//! 2. **First usable wins**: tiers are consulted in order; a found node of
//!    the wrong [`Shape`] counts as absent and the walk continues.
//! 3. **Tail is ground truth**: the last tier is expected to hold every path
//!    its callers ask for. The chain does not enforce that, but it never
//!    fails if the tail is incomplete either:
//!
//! | Shape | Nothing usable anywhere |
//! |-------|-------------------------|
//! | text  | the dotted path itself  |
//! | list  | an empty slice          |
//! | tree  | an empty tree           |
//!
//! Resolution is read-only, so a chain can be shared freely between
//! renders and threads.

use serde::Serialize;

use crate::path::resolve;
use crate::tree::{ContentNode, ContentTree};

/// Label for the tree of the currently active locale.
pub const LOCALE_CONTEXT: &str = "locale-context";
/// Label for the statically bundled default-locale tree.
pub const BUNDLED_DEFAULT: &str = "bundled-default";
/// Label for the hand-authored literal defaults.
pub const LITERAL: &str = "literal";

static EMPTY_TREE: ContentTree = ContentTree::new();

/// Expected shape of the value at a call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Text,
    List,
    Tree,
}

impl Shape {
    #[must_use]
    pub fn accepts(self, node: &ContentNode) -> bool {
        matches!(
            (self, node),
            (Self::Text, ContentNode::Text(_))
                | (Self::List, ContentNode::List(_))
                | (Self::Tree, ContentNode::Tree(_))
        )
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::List => "list",
            Self::Tree => "tree",
        }
    }
}

/// One candidate in a chain. `tree` is `None` when that source is
/// currently unavailable (e.g. the locale context failed to load).
#[derive(Debug, Clone, Copy)]
pub struct Tier<'a> {
    pub label: &'a str,
    pub tree: Option<&'a ContentTree>,
}

/// A node found by the chain, with the tier that supplied it.
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
    pub node: &'a ContentNode,
    pub tier: usize,
    pub label: &'a str,
}

#[derive(Debug, Clone)]
pub struct FallbackChain<'a> {
    tiers: Vec<Tier<'a>>,
}

impl<'a> FallbackChain<'a> {
    /// A chain consisting only of its tail.
    #[must_use]
    pub fn new(label: &'a str, tail: &'a ContentTree) -> Self {
        Self::builder().finish(label, tail)
    }

    #[must_use]
    pub fn builder() -> FallbackChainBuilder<'a> {
        FallbackChainBuilder {
            preferred: Vec::new(),
        }
    }

    /// The usual page chain: active locale, bundled default, literal
    /// defaults.
    #[must_use]
    pub fn for_page(
        context: Option<&'a ContentTree>,
        bundled: Option<&'a ContentTree>,
        literal: &'a ContentTree,
    ) -> Self {
        Self::builder()
            .candidate(LOCALE_CONTEXT, context)
            .candidate(BUNDLED_DEFAULT, bundled)
            .finish(LITERAL, literal)
    }

    #[must_use]
    pub fn tiers(&self) -> &[Tier<'a>] {
        &self.tiers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Whether the chain has no tiers. Every built chain holds its tail tier.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// First node at `path` whose shape matches, walking tiers in order.
    #[must_use]
    pub fn resolve(&self, path: &str, shape: Shape) -> Option<Resolved<'a>> {
        for (index, tier) in self.tiers.iter().enumerate() {
            match resolve(tier.tree, path) {
                Some(node) if shape.accepts(node) => {
                    if index > 0 {
                        tracing::debug!(
                            path,
                            tier = tier.label,
                            shape = shape.as_str(),
                            "resolved via fallback tier"
                        );
                    }
                    return Some(Resolved {
                        node,
                        tier: index,
                        label: tier.label,
                    });
                }
                Some(node) => {
                    tracing::debug!(
                        path,
                        tier = tier.label,
                        expected = shape.as_str(),
                        found = node.type_name(),
                        "skipping value of the wrong shape"
                    );
                }
                None => {}
            }
        }

        tracing::warn!(
            path,
            shape = shape.as_str(),
            tiers = self.tiers.len(),
            "no tier in the fallback chain holds this path"
        );
        None
    }

    /// Display text for `path`; the path itself if no tier has text there.
    #[must_use]
    pub fn text<'p>(&self, path: &'p str) -> &'p str
    where
        'a: 'p,
    {
        match self
            .resolve(path, Shape::Text)
            .and_then(|resolved| resolved.node.as_text())
        {
            Some(text) => text,
            None => path,
        }
    }

    /// List items for `path`; empty if no tier has a list there.
    #[must_use]
    pub fn list(&self, path: &str) -> &'a [ContentNode] {
        self.resolve(path, Shape::List)
            .and_then(|resolved| resolved.node.as_list())
            .unwrap_or(&[])
    }

    /// Text items of the list at `path`, skipping non-text entries.
    #[must_use]
    pub fn texts(&self, path: &str) -> Vec<&'a str> {
        self.list(path)
            .iter()
            .filter_map(ContentNode::as_text)
            .collect()
    }

    /// Subtree at `path`; empty if no tier has a section there.
    #[must_use]
    pub fn section(&self, path: &str) -> &'a ContentTree {
        self.resolve(path, Shape::Tree)
            .and_then(|resolved| resolved.node.as_tree())
            .unwrap_or(&EMPTY_TREE)
    }
}

/// Collects preferred tiers; the chain only exists once a tail is given.
#[derive(Debug, Clone)]
pub struct FallbackChainBuilder<'a> {
    preferred: Vec<Tier<'a>>,
}

impl<'a> FallbackChainBuilder<'a> {
    #[must_use]
    pub fn candidate(mut self, label: &'a str, tree: Option<&'a ContentTree>) -> Self {
        self.preferred.push(Tier { label, tree });
        self
    }

    #[must_use]
    pub fn finish(mut self, label: &'a str, tail: &'a ContentTree) -> FallbackChain<'a> {
        self.preferred.push(Tier {
            label,
            tree: Some(tail),
        });
        FallbackChain {
            tiers: self.preferred,
        }
    }
}
