//! Dotted key path lookup.
//!
//! `resolve` is total: any tree (or none at all) and any path yield either
//! the stored node or `None`. Lists are terminal; a segment after a list
//! never indexes into it.

use crate::tree::{ContentNode, ContentTree, PATH_SEPARATOR};

/// Look up `path` in `tree`.
///
/// Returns the node stored at the final segment regardless of its type;
/// shape checks belong to the caller. An absent root, an empty path, an
/// empty segment, a missing key, or a non-tree node before the last
/// segment all resolve to `None`.
#[must_use]
pub fn resolve<'a>(tree: Option<&'a ContentTree>, path: &str) -> Option<&'a ContentNode> {
    let mut current = tree?;
    if path.is_empty() {
        return None;
    }

    let mut segments = path.split(PATH_SEPARATOR).peekable();
    while let Some(segment) = segments.next() {
        if segment.is_empty() {
            return None;
        }
        let node = current.get(segment)?;
        if segments.peek().is_none() {
            return Some(node);
        }
        current = node.as_tree()?;
    }
    None
}

impl ContentTree {
    /// Shorthand for [`resolve`] on this tree.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&ContentNode> {
        resolve(Some(self), path)
    }
}
