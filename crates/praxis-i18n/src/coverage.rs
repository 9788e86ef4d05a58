//! Per-category coverage of a diff.
//!
//! Categories come from an external inventory of which keys each page
//! uses. Findings whose path is not in the inventory stay in the report but
//! are not aggregated.
//!
//! # Grading
//!
//! | Coverage       | Grade  |
//! |----------------|--------|
//! | `>= 90`        | `pass` |
//! | `>= 70, < 90`  | `warn` |
//! | `< 70`         | `fail` |
//!
//! An empty category counts as 100% covered.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::classify::FindingKind;
use crate::diff::Finding;
use crate::error::{I18nError, Result};

pub const PASS_THRESHOLD: f64 = 90.0;
pub const WARN_THRESHOLD: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Pass,
    Warn,
    Fail,
}

impl Grade {
    #[must_use]
    pub fn for_coverage(coverage_percent: f64) -> Self {
        if coverage_percent >= PASS_THRESHOLD {
            Self::Pass
        } else if coverage_percent >= WARN_THRESHOLD {
            Self::Warn
        } else {
            Self::Fail
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Warn => "warn",
            Self::Fail => "fail",
        }
    }
}

/// Path → category lookup built from an inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryIndex {
    by_path: BTreeMap<String, String>,
    categories: BTreeSet<String>,
}

impl CategoryIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a category even if no path is assigned to it yet.
    pub fn add_category(&mut self, category: impl Into<String>) {
        self.categories.insert(category.into());
    }

    /// Assign `path` to `category`. Re-assigning to the same category is a
    /// no-op; assigning to a second one is an error.
    pub fn assign(&mut self, path: impl Into<String>, category: impl Into<String>) -> Result<()> {
        let path = path.into();
        let category = category.into();

        if let Some(existing) = self.by_path.get(&path) {
            if *existing == category {
                return Ok(());
            }
            return Err(I18nError::AmbiguousCategory {
                path,
                first: existing.clone(),
                second: category,
            });
        }

        self.categories.insert(category.clone());
        self.by_path.insert(path, category);
        Ok(())
    }

    /// Build from `{ "<category>": ["path", ...] }`.
    pub fn from_inventory(inventory: BTreeMap<String, Vec<String>>) -> Result<Self> {
        let mut index = Self::new();
        for (category, paths) in inventory {
            index.add_category(category.clone());
            for path in paths {
                index.assign(path, category.clone())?;
            }
        }
        Ok(index)
    }

    pub fn from_json_str(source: &str) -> Result<Self> {
        let inventory: BTreeMap<String, Vec<String>> = serde_json::from_str(source)?;
        Self::from_inventory(inventory)
    }

    #[must_use]
    pub fn category_of(&self, path: &str) -> Option<&str> {
        self.by_path.get(path).map(String::as_str)
    }

    /// Category labels in sorted order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(String::as_str)
    }

    /// Number of mapped paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty() && self.categories.is_empty()
    }
}

/// Aggregate statistics for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageRecord {
    pub category: String,
    pub total_keys: usize,
    pub resolved_keys: usize,
    pub placeholder_keys: usize,
    pub coverage_percent: f64,
    pub grade: Grade,
    /// Non-success paths, sorted.
    pub unresolved: Vec<String>,
}

#[derive(Default)]
struct Tally {
    total: usize,
    resolved: usize,
    placeholders: usize,
    unresolved: Vec<String>,
}

/// Group findings by category and grade each group.
///
/// Output is sorted by category label and does not depend on the order of
/// `findings`.
#[must_use]
pub fn aggregate(findings: &[Finding], index: &CategoryIndex) -> Vec<CoverageRecord> {
    let mut tallies: BTreeMap<&str, Tally> = index
        .categories()
        .map(|category| (category, Tally::default()))
        .collect();

    for finding in findings {
        let Some(category) = index.category_of(&finding.path) else {
            continue;
        };
        let tally = tallies.entry(category).or_default();
        tally.total += 1;
        match finding.kind {
            FindingKind::Success => tally.resolved += 1,
            FindingKind::Placeholder => {
                tally.placeholders += 1;
                tally.unresolved.push(finding.path.clone());
            }
            _ => tally.unresolved.push(finding.path.clone()),
        }
    }

    tallies
        .into_iter()
        .map(|(category, mut tally)| {
            tally.unresolved.sort_unstable();
            let coverage_percent = coverage_percent(tally.resolved, tally.total);
            CoverageRecord {
                category: category.to_string(),
                total_keys: tally.total,
                resolved_keys: tally.resolved,
                placeholder_keys: tally.placeholders,
                coverage_percent,
                grade: Grade::for_coverage(coverage_percent),
                unresolved: tally.unresolved,
            }
        })
        .collect()
}

/// `resolved / total * 100`, or 100 for an empty group.
#[must_use]
pub fn coverage_percent(resolved: usize, total: usize) -> f64 {
    if total == 0 {
        100.0
    } else {
        resolved as f64 / total as f64 * 100.0
    }
}
