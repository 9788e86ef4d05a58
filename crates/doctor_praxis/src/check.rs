use std::path::PathBuf;

use clap::Args;
use praxis_i18n::{CategoryIndex, FailurePolicy, Report, ReportBuilder, render_summary};

use crate::config::DoctorConfig;
use crate::error::{DoctorError, Result};
use crate::report::render_html;
use crate::util::{
    OutputIntegration, locale_label, now_utc_iso, output_for, read_index, read_target_tree,
    read_tree, write_string,
};

pub const DEFAULT_OUTPUT_JSON: &str = "locale-report.json";

#[derive(Debug, Clone, Default, Args)]
pub struct CheckArgs {
    /// Reference (complete) locale file.
    #[arg(long)]
    pub reference: Option<PathBuf>,

    /// Locale file under test.
    #[arg(long)]
    pub target: Option<PathBuf>,

    /// Category inventory: `{ "<category>": ["path", ...] }`.
    #[arg(long)]
    pub categories: Option<PathBuf>,

    #[arg(long = "output-json")]
    pub output_json: Option<PathBuf>,

    #[arg(long = "output-html")]
    pub output_html: Option<PathBuf>,

    #[arg(long = "reference-locale")]
    pub reference_locale: Option<String>,

    #[arg(long = "target-locale")]
    pub target_locale: Option<String>,

    /// Count TYPE_ERROR findings as warnings instead of failures.
    #[arg(long = "allow-type-errors")]
    pub allow_type_errors: bool,

    /// Number of failing findings printed in the summary.
    #[arg(long)]
    pub sample: Option<usize>,
}

impl CheckArgs {
    /// Flags override the file config.
    fn apply(self, mut config: DoctorConfig) -> DoctorConfig {
        config.reference = self.reference.or(config.reference);
        config.target = self.target.or(config.target);
        config.categories = self.categories.or(config.categories);
        config.output_json = self.output_json.or(config.output_json);
        config.output_html = self.output_html.or(config.output_html);
        config.reference_locale = self.reference_locale.or(config.reference_locale);
        config.target_locale = self.target_locale.or(config.target_locale);
        if self.allow_type_errors {
            config.type_errors_fail = false;
        }
        if let Some(sample) = self.sample {
            config.sample_size = sample;
        }
        config
    }
}

#[derive(Debug, Clone)]
struct CheckPlan {
    reference: PathBuf,
    target: PathBuf,
    categories: Option<PathBuf>,
    output_json: PathBuf,
    output_html: Option<PathBuf>,
    reference_locale: String,
    target_locale: String,
    policy: FailurePolicy,
    sample_size: usize,
}

impl CheckPlan {
    fn from_config(config: DoctorConfig) -> Result<Self> {
        let problems = config.validate();
        if !problems.is_empty() {
            return Err(DoctorError::invalid(problems.join("; ")));
        }
        let (Some(reference), Some(target)) = (config.reference, config.target) else {
            return Err(DoctorError::invalid("reference and target must be set"));
        };

        Ok(Self {
            reference_locale: config
                .reference_locale
                .unwrap_or_else(|| locale_label(&reference)),
            target_locale: config.target_locale.unwrap_or_else(|| locale_label(&target)),
            reference,
            target,
            categories: config.categories,
            output_json: config
                .output_json
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_JSON)),
            output_html: config.output_html,
            policy: FailurePolicy {
                type_errors_fail: config.type_errors_fail,
            },
            sample_size: config.sample_size,
        })
    }
}

pub fn run_check(args: CheckArgs, config: DoctorConfig) -> Result<()> {
    let integration = OutputIntegration::detect();
    run_check_with_integration(args, config, &integration).map(|_| ())
}

pub(crate) fn run_check_with_integration(
    args: CheckArgs,
    config: DoctorConfig,
    integration: &OutputIntegration,
) -> Result<Report> {
    let ui = output_for(integration);
    let plan = CheckPlan::from_config(args.apply(config))?;

    let reference = read_tree(&plan.reference)?;
    let (target, skipped) = read_target_tree(&plan.target)?;
    let index = match &plan.categories {
        Some(path) => read_index(path)?,
        None => {
            tracing::debug!("no category inventory given; coverage table will be empty");
            CategoryIndex::new()
        }
    };

    let report = ReportBuilder::new(now_utc_iso())
        .locales(&plan.reference_locale, &plan.target_locale)
        .policy(plan.policy)
        .skipped(skipped)
        .validate(&reference, Some(&target), &index)?;

    write_string(&plan.output_json, &report.to_json_pretty()?)?;
    if let Some(output_html) = &plan.output_html {
        let title = format!("Locale check: {}", report.target_locale);
        let html = render_html(&report, &title, Some(plan.output_json.as_path()), output_html);
        write_string(output_html, &html)?;
    }

    ui.rule(Some("locale check"));
    ui.block(&render_summary(&report, plan.sample_size));
    ui.info(&format!("report JSON: {}", plan.output_json.display()));
    if let Some(output_html) = &plan.output_html {
        ui.info(&format!("report HTML: {}", output_html.display()));
    }

    let status = if report.is_failed() { "failed" } else { "ok" };
    if integration.should_emit_json() {
        println!(
            "{}",
            serde_json::json!({
                "command": "check",
                "status": status,
                "summary": report.summary,
                "report_json": plan.output_json.display().to_string(),
                "report_html": plan.output_html.as_ref().map(|p| p.display().to_string()),
                "integration": integration,
            })
        );
    }

    if !report.skipped_keys.is_empty() {
        ui.warning(&format!(
            "{} key(s) in {} skipped: not addressable by a dotted path",
            report.skipped_keys.len(),
            plan.target.display()
        ));
    }

    if report.is_failed() {
        ui.error(&format!(
            "{} failing finding(s) in {}",
            report.summary.total_failed, report.target_locale
        ));
        return Err(DoctorError::exit(
            1,
            format!(
                "locale check failed: {} of {} keys failing",
                report.summary.total_failed, report.summary.total_tests
            ),
        ));
    }

    if report.summary.total_warnings > 0 {
        ui.warning(&format!(
            "{} warning(s) in {}",
            report.summary.total_warnings, report.target_locale
        ));
    }
    ui.success(&format!("{} is complete", report.target_locale));
    Ok(report)
}
