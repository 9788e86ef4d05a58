//! Validation report: totals, findings, and per-category coverage.
//!
//! Building a report is pure. The timestamp is supplied by the caller, so
//! two passes over identical inputs serialize identically apart from it.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::classify::FindingKind;
use crate::coverage::{CategoryIndex, CoverageRecord, aggregate};
use crate::diff::{Finding, diff};
use crate::error::Result;
use crate::tree::{ContentTree, SkippedKey};

/// Which findings count as hard failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailurePolicy {
    /// Count `TYPE_ERROR` as a failure; otherwise as a warning.
    pub type_errors_fail: bool,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        Self {
            type_errors_fail: true,
        }
    }
}

impl FailurePolicy {
    #[must_use]
    pub fn is_failure(self, kind: FindingKind) -> bool {
        match kind {
            FindingKind::Missing | FindingKind::Empty => true,
            FindingKind::TypeError => self.type_errors_fail,
            FindingKind::Success | FindingKind::Placeholder => false,
        }
    }

    #[must_use]
    pub fn is_warning(self, kind: FindingKind) -> bool {
        match kind {
            FindingKind::Placeholder => true,
            FindingKind::TypeError => !self.type_errors_fail,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_tests: usize,
    pub total_passed: usize,
    pub total_failed: usize,
    pub total_warnings: usize,
    pub success_rate: f64,
}

impl Summary {
    #[must_use]
    pub fn from_findings(findings: &[Finding], policy: FailurePolicy) -> Self {
        let total_passed = findings.iter().filter(|f| f.is_success()).count();
        let total_failed = findings
            .iter()
            .filter(|f| policy.is_failure(f.kind))
            .count();
        let total_warnings = findings
            .iter()
            .filter(|f| policy.is_warning(f.kind))
            .count();

        let denominator = total_passed + total_failed + total_warnings;
        let success_rate = if denominator == 0 {
            0.0
        } else {
            total_passed as f64 / denominator as f64 * 100.0
        };

        Self {
            total_tests: findings.len(),
            total_passed,
            total_failed,
            total_warnings,
            success_rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub timestamp: String,
    pub reference_locale: String,
    pub target_locale: String,
    pub reference_digest: String,
    pub target_digest: Option<String>,
    pub policy: FailurePolicy,
    pub summary: Summary,
    pub findings: Vec<Finding>,
    pub categories: Vec<CoverageRecord>,
    /// Target entries dropped at load time because no path can reach them.
    #[serde(default)]
    pub skipped_keys: Vec<SkippedKey>,
}

impl Report {
    /// Whether the pass should gate a pipeline.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.summary.total_failed > 0
    }

    /// Findings counted as hard failures, in path order.
    pub fn failures(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|finding| self.policy.is_failure(finding.kind))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json_str(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }
}

/// Metadata for a report; the findings and coverage come from the pass.
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    timestamp: String,
    reference_locale: String,
    target_locale: String,
    policy: FailurePolicy,
    skipped_keys: Vec<SkippedKey>,
}

impl ReportBuilder {
    #[must_use]
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            reference_locale: "reference".to_string(),
            target_locale: "target".to_string(),
            policy: FailurePolicy::default(),
            skipped_keys: Vec::new(),
        }
    }

    #[must_use]
    pub fn locales(mut self, reference: impl Into<String>, target: impl Into<String>) -> Self {
        self.reference_locale = reference.into();
        self.target_locale = target.into();
        self
    }

    #[must_use]
    pub fn policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Carry entries a lenient target load dropped into the report.
    #[must_use]
    pub fn skipped(mut self, skipped_keys: Vec<SkippedKey>) -> Self {
        self.skipped_keys = skipped_keys;
        self
    }

    /// Assemble a report from an already computed pass.
    #[must_use]
    pub fn build(
        self,
        reference: &ContentTree,
        target: Option<&ContentTree>,
        findings: Vec<Finding>,
        categories: Vec<CoverageRecord>,
    ) -> Report {
        let summary = Summary::from_findings(&findings, self.policy);
        Report {
            timestamp: self.timestamp,
            reference_locale: self.reference_locale,
            target_locale: self.target_locale,
            reference_digest: reference.digest(),
            target_digest: target.map(ContentTree::digest),
            policy: self.policy,
            summary,
            findings,
            categories,
            skipped_keys: self.skipped_keys,
        }
    }

    /// Run a full pass: diff, aggregate, build.
    pub fn validate(
        self,
        reference: &ContentTree,
        target: Option<&ContentTree>,
        index: &CategoryIndex,
    ) -> Result<Report> {
        let findings = diff(reference, target)?;
        let categories = aggregate(&findings, index);
        let report = self.build(reference, target, findings, categories);
        tracing::info!(
            reference = %report.reference_locale,
            target = %report.target_locale,
            passed = report.summary.total_passed,
            failed = report.summary.total_failed,
            warnings = report.summary.total_warnings,
            "validation pass complete"
        );
        Ok(report)
    }
}

/// Human-readable summary: totals, category grades, and up to `sample`
/// failing findings.
#[must_use]
pub fn render_summary(report: &Report, sample: usize) -> String {
    let summary = &report.summary;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "locale check: {} against {}",
        report.target_locale, report.reference_locale
    );
    let _ = writeln!(
        out,
        "  total={} passed={} failed={} warnings={} success_rate={:.1}%",
        summary.total_tests,
        summary.total_passed,
        summary.total_failed,
        summary.total_warnings,
        summary.success_rate
    );

    if !report.categories.is_empty() {
        let width = report
            .categories
            .iter()
            .map(|record| record.category.len())
            .max()
            .unwrap_or(0);
        let _ = writeln!(out, "categories:");
        for record in &report.categories {
            let _ = writeln!(
                out,
                "  [{:<4}] {:<width$}  {:>5.1}%  ({}/{} resolved, {} placeholder)",
                record.grade.as_str(),
                record.category,
                record.coverage_percent,
                record.resolved_keys,
                record.total_keys,
                record.placeholder_keys,
            );
        }
    }

    let failures = report.failures().collect::<Vec<_>>();
    if !failures.is_empty() {
        let shown = failures.len().min(sample);
        let _ = writeln!(out, "failures (showing {shown} of {}):", failures.len());
        for finding in failures.iter().take(sample) {
            let _ = writeln!(
                out,
                "  {:<10} {}  (reference: {:?})",
                finding.kind.as_str(),
                finding.path,
                finding.reference_value
            );
        }
    }

    if !report.skipped_keys.is_empty() {
        let _ = writeln!(
            out,
            "skipped target keys ({}):",
            report.skipped_keys.len()
        );
        for skipped in report.skipped_keys.iter().take(sample) {
            let _ = writeln!(out, "  {}  ({})", skipped.path, skipped.reason);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn tree(value: serde_json::Value) -> ContentTree {
        ContentTree::from_json_value(value).expect("tree")
    }

    fn finding(path: &str, kind: FindingKind) -> Finding {
        Finding {
            path: path.to_string(),
            kind,
            reference_value: "X".to_string(),
            candidate_value: None,
        }
    }

    #[test]
    fn totals_follow_policy() {
        let findings = vec![
            finding("a", FindingKind::Success),
            finding("b", FindingKind::Missing),
            finding("c", FindingKind::Empty),
            finding("d", FindingKind::Placeholder),
            finding("e", FindingKind::TypeError),
        ];

        let strict = Summary::from_findings(&findings, FailurePolicy::default());
        assert_eq!(strict.total_tests, 5);
        assert_eq!(strict.total_passed, 1);
        assert_eq!(strict.total_failed, 3);
        assert_eq!(strict.total_warnings, 1);
        assert!((strict.success_rate - 20.0).abs() < 1e-9);

        let lenient = Summary::from_findings(
            &findings,
            FailurePolicy {
                type_errors_fail: false,
            },
        );
        assert_eq!(lenient.total_failed, 2);
        assert_eq!(lenient.total_warnings, 2);
    }

    #[test]
    fn empty_pass_has_zero_success_rate() {
        let summary = Summary::from_findings(&[], FailurePolicy::default());
        assert_eq!(summary.total_tests, 0);
        assert!(summary.success_rate.abs() < f64::EPSILON);
    }

    #[test]
    fn validate_builds_a_complete_report() {
        let reference = tree(json!({ "nav": { "home": "Home", "contact": "Contact" } }));
        let target = tree(json!({ "nav": { "home": "Start" } }));
        let mut index = CategoryIndex::new();
        index.assign("nav.home", "navigation").expect("assign");
        index.assign("nav.contact", "navigation").expect("assign");

        let report = ReportBuilder::new("2026-10-19T00:00:00Z")
            .locales("en", "de")
            .validate(&reference, Some(&target), &index)
            .expect("validate");

        assert!(report.is_failed());
        assert_eq!(report.summary.total_failed, 1);
        assert_eq!(report.categories.len(), 1);
        assert_eq!(report.categories[0].coverage_percent, 50.0);
        assert_eq!(report.reference_digest, reference.digest());
        assert_eq!(report.target_digest, Some(target.digest()));
        assert_eq!(
            report.failures().map(|f| f.path.as_str()).collect::<Vec<_>>(),
            vec!["nav.contact"]
        );
    }

    #[test]
    fn identical_inputs_serialize_identically() {
        let reference = tree(json!({ "a": { "b": "B", "c": ["x", "y"] }, "d": "D" }));
        let target = tree(json!({ "a": { "b": "[needs-translation:B]" }, "d": "" }));
        let index = CategoryIndex::new();

        let first = ReportBuilder::new("t")
            .validate(&reference, Some(&target), &index)
            .expect("first");
        let second = ReportBuilder::new("t")
            .validate(&reference, Some(&target), &index)
            .expect("second");
        assert_eq!(
            first.to_json_pretty().expect("json"),
            second.to_json_pretty().expect("json")
        );
    }

    #[test]
    fn json_round_trip_uses_snake_case_fields() {
        let report = ReportBuilder::new("t").build(
            &ContentTree::new(),
            None,
            vec![finding("a", FindingKind::Missing)],
            Vec::new(),
        );
        let encoded = report.to_json_pretty().expect("json");
        let value: serde_json::Value = serde_json::from_str(&encoded).expect("value");
        assert_eq!(value["summary"]["total_failed"], 1);
        assert_eq!(value["findings"][0]["kind"], "MISSING");
        assert_eq!(value["target_digest"], serde_json::Value::Null);
        assert_eq!(Report::from_json_str(&encoded).expect("decode"), report);
    }

    #[test]
    fn summary_samples_failures() {
        let findings = (0..8)
            .map(|i| finding(&format!("k{i}"), FindingKind::Missing))
            .collect::<Vec<_>>();
        let report = ReportBuilder::new("t")
            .locales("en", "fr")
            .build(&ContentTree::new(), None, findings, Vec::new());

        let text = render_summary(&report, 5);
        assert!(text.contains("locale check: fr against en"));
        assert!(text.contains("failures (showing 5 of 8):"));
        assert!(text.contains("k4"));
        assert!(!text.contains("k5"));
    }

    #[test]
    fn summary_lists_category_grades() {
        let reference = tree(json!({ "a": "A", "b": "B" }));
        let mut index = CategoryIndex::new();
        index.assign("a", "home page").expect("assign");
        index.add_category("imprint page");
        let report = ReportBuilder::new("t")
            .validate(&reference, Some(&reference), &index)
            .expect("validate");

        let text = render_summary(&report, 5);
        assert!(text.contains("[pass] home page"));
        assert!(text.contains("[pass] imprint page"));
        assert!(!text.contains("failures"));
    }

    #[test]
    fn summary_lists_skipped_target_keys() {
        let reference = tree(json!({ "a": "A" }));
        let report = ReportBuilder::new("t")
            .skipped(vec![crate::tree::SkippedKey {
                path: "legacy.old.key".to_string(),
                reason: "key contains the path separator '.'".to_string(),
            }])
            .validate(&reference, Some(&reference), &CategoryIndex::new())
            .expect("validate");

        assert!(!report.is_failed());
        let text = render_summary(&report, 5);
        assert!(text.contains("skipped target keys (1):"));
        assert!(text.contains("legacy.old.key"));
    }

    #[test]
    fn skipped_keys_default_when_absent_from_json() {
        let reference = tree(json!({ "a": "A" }));
        let report = ReportBuilder::new("t")
            .validate(&reference, Some(&reference), &CategoryIndex::new())
            .expect("validate");
        let mut value = serde_json::to_value(&report).expect("value");
        value.as_object_mut().expect("object").remove("skipped_keys");

        let decoded = Report::from_json_str(&value.to_string()).expect("decode");
        assert!(decoded.skipped_keys.is_empty());
    }
}
