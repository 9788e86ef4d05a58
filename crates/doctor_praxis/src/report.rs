use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use praxis_i18n::{FindingKind, Report};

use crate::error::Result;
use crate::util::{OutputIntegration, ensure_exists, output_for, relative_to, write_string};

#[derive(Debug, Clone, Args)]
pub struct ReportArgs {
    /// Report JSON written by `check`.
    #[arg(long)]
    pub input: PathBuf,

    #[arg(long = "output-html")]
    pub output_html: Option<PathBuf>,

    #[arg(long, default_value = "Locale Coverage Report")]
    pub title: String,
}

fn html_escape(value: &str) -> String {
    v_htmlescape::escape(value).to_string()
}

fn kind_class(kind: FindingKind) -> &'static str {
    match kind {
        FindingKind::Success => "ok",
        FindingKind::Placeholder => "warn",
        FindingKind::Missing | FindingKind::Empty | FindingKind::TypeError => "fail",
    }
}

/// Render a report as a standalone HTML page. When `raw_json` is given, the
/// page links to it relative to `html_path`.
#[must_use]
pub fn render_html(
    report: &Report,
    title: &str,
    raw_json: Option<&Path>,
    html_path: &Path,
) -> String {
    let summary = &report.summary;
    let mut html = String::new();

    html.push_str(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"utf-8\">\n  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
    );
    html.push_str(&format!("  <title>{}</title>\n", html_escape(title)));
    html.push_str(
        "  <style>\n    body { font-family: ui-sans-serif, -apple-system, Segoe UI, Roboto, Arial, sans-serif; margin: 24px; background: #fbfaf7; color: #1f2933; }\n    h1, h2 { margin: 0 0 12px; }\n    .meta { margin-bottom: 20px; color: #52606d; }\n    table { border-collapse: collapse; width: 100%; margin-bottom: 24px; font-size: 13px; }\n    th, td { text-align: left; padding: 6px 10px; border-bottom: 1px solid #e4e7eb; }\n    code { font-size: 12px; }\n    .pass, .ok { border-left: 5px solid #2cb67d; }\n    .warn { border-left: 5px solid #f0b429; }\n    .fail { border-left: 5px solid #ef4565; }\n    a { color: #2d5bd7; text-decoration: none; }\n  </style>\n</head>\n<body>\n",
    );

    html.push_str(&format!("<h1>{}</h1>\n", html_escape(title)));
    html.push_str(&format!(
        "<div class=\"meta\">{} against {} | generated_at={} | total={} | passed={} | failed={} | warnings={} | success_rate={:.1}%</div>\n",
        html_escape(&report.target_locale),
        html_escape(&report.reference_locale),
        html_escape(&report.timestamp),
        summary.total_tests,
        summary.total_passed,
        summary.total_failed,
        summary.total_warnings,
        summary.success_rate,
    ));

    let base = html_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    if let Some(link) = raw_json.and_then(|json| relative_to(base, json)) {
        let link = link.display().to_string();
        html.push_str(&format!(
            "<div class=\"meta\"><a href=\"{}\">raw report JSON</a></div>\n",
            html_escape(&link)
        ));
    }

    if !report.categories.is_empty() {
        html.push_str("<h2>Categories</h2>\n<table>\n<tr><th>category</th><th>grade</th><th>coverage</th><th>resolved</th><th>placeholder</th></tr>\n");
        for record in &report.categories {
            html.push_str(&format!(
                "<tr class=\"{grade}\"><td>{}</td><td>{grade}</td><td>{:.1}%</td><td>{}/{}</td><td>{}</td></tr>\n",
                html_escape(&record.category),
                record.coverage_percent,
                record.resolved_keys,
                record.total_keys,
                record.placeholder_keys,
                grade = record.grade.as_str(),
            ));
        }
        html.push_str("</table>\n");
    }

    let open = report
        .findings
        .iter()
        .filter(|finding| !finding.kind.is_success())
        .collect::<Vec<_>>();
    html.push_str(&format!("<h2>Open findings ({})</h2>\n", open.len()));
    if open.is_empty() {
        html.push_str("<p>Every reference key is translated.</p>\n");
    } else {
        html.push_str("<table>\n<tr><th>kind</th><th>path</th><th>reference</th><th>candidate</th></tr>\n");
        for finding in open {
            html.push_str(&format!(
                "<tr class=\"{}\"><td>{}</td><td><code>{}</code></td><td>{}</td><td>{}</td></tr>\n",
                kind_class(finding.kind),
                finding.kind.as_str(),
                html_escape(&finding.path),
                html_escape(&finding.reference_value),
                html_escape(finding.candidate_value.as_deref().unwrap_or("")),
            ));
        }
        html.push_str("</table>\n");
    }

    if !report.skipped_keys.is_empty() {
        html.push_str(&format!(
            "<h2>Skipped target keys ({})</h2>\n<table>\n<tr><th>path</th><th>reason</th></tr>\n",
            report.skipped_keys.len()
        ));
        for skipped in &report.skipped_keys {
            html.push_str(&format!(
                "<tr class=\"warn\"><td><code>{}</code></td><td>{}</td></tr>\n",
                html_escape(&skipped.path),
                html_escape(&skipped.reason),
            ));
        }
        html.push_str("</table>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

pub fn run_report(args: ReportArgs) -> Result<()> {
    let integration = OutputIntegration::detect();
    run_report_with_integration(args, &integration)
}

fn run_report_with_integration(args: ReportArgs, integration: &OutputIntegration) -> Result<()> {
    let ui = output_for(integration);

    ensure_exists(&args.input)?;
    let report = Report::from_json_str(&fs::read_to_string(&args.input)?)?;

    let output_html = args
        .output_html
        .unwrap_or_else(|| args.input.with_extension("html"));
    let html = render_html(&report, &args.title, Some(args.input.as_path()), &output_html);
    write_string(&output_html, &html)?;

    ui.success(&format!("report HTML: {}", output_html.display()));

    if integration.should_emit_json() {
        println!(
            "{}",
            serde_json::json!({
                "command": "report",
                "status": "ok",
                "report_json": args.input.display().to_string(),
                "report_html": output_html.display().to_string(),
                "integration": integration,
            })
        );
    }

    Ok(())
}
