//! Lock-step comparison of a reference tree against a target tree.
//!
//! The reference decides which paths must exist. Every leaf reachable from
//! it yields exactly one [`Finding`]; keys present only in the target are
//! never visited. A target node that should be a section but is not is
//! treated as absent, so its descendants report `Missing`.

use serde::{Deserialize, Serialize};

use crate::classify::{FindingKind, classify};
use crate::error::{I18nError, Result};
use crate::tree::{ContentNode, ContentTree, MAX_TREE_DEPTH, join_path};

/// One classified leaf comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub path: String,
    pub kind: FindingKind,
    pub reference_value: String,
    pub candidate_value: Option<String>,
}

impl Finding {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.kind.is_success()
    }
}

/// Walk `reference` and classify every leaf against `target`.
///
/// Fails only with [`I18nError::Structural`] when the reference nests
/// deeper than [`MAX_TREE_DEPTH`]; every other anomaly becomes a finding.
pub fn diff(reference: &ContentTree, target: Option<&ContentTree>) -> Result<Vec<Finding>> {
    let mut findings = Vec::new();
    walk(reference, target, "", 1, &mut findings)?;

    let failing = findings.iter().filter(|f| !f.is_success()).count();
    tracing::info!(
        leaves = findings.len(),
        non_success = failing,
        "content diff complete"
    );
    Ok(findings)
}

fn walk(
    reference: &ContentTree,
    target: Option<&ContentTree>,
    prefix: &str,
    depth: usize,
    findings: &mut Vec<Finding>,
) -> Result<()> {
    if depth > MAX_TREE_DEPTH {
        return Err(I18nError::Structural {
            path: if prefix.is_empty() {
                "<root>".to_string()
            } else {
                prefix.to_string()
            },
            depth: MAX_TREE_DEPTH,
        });
    }

    for (key, reference_node) in reference.iter() {
        let path = join_path(prefix, key);
        let candidate = target.and_then(|tree| tree.get(key));

        match reference_node {
            ContentNode::Tree(reference_child) => {
                let target_child = candidate.and_then(ContentNode::as_tree);
                walk(reference_child, target_child, &path, depth + 1, findings)?;
            }
            leaf => {
                let Some(kind) = classify(leaf, candidate) else {
                    continue;
                };
                if !kind.is_success() {
                    tracing::debug!(path = %path, kind = kind.as_str(), "leaf not translated");
                }
                findings.push(Finding {
                    path,
                    kind,
                    reference_value: leaf.render(),
                    candidate_value: candidate.map(ContentNode::render),
                });
            }
        }
    }
    Ok(())
}
