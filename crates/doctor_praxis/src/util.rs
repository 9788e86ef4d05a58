use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use fastapi_output::RichOutput;
use praxis_i18n::{CategoryIndex, ContentTree, SkippedKey};
use serde::Serialize;
use sqlmodel_console::OutputMode as SqlModelOutputMode;

use crate::error::{DoctorError, Result};

#[must_use]
pub fn now_utc_iso() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[derive(Debug, Clone, Serialize)]
pub struct OutputIntegration {
    pub fastapi_mode: String,
    pub fastapi_agent: bool,
    pub fastapi_ci: bool,
    pub fastapi_tty: bool,
    pub sqlmodel_mode: String,
    pub sqlmodel_agent: bool,
}

impl OutputIntegration {
    #[must_use]
    pub fn detect() -> Self {
        let fastapi_detection = fastapi_output::detect_environment();
        let fastapi_mode = fastapi_output::OutputMode::auto();
        let sqlmodel_mode = SqlModelOutputMode::detect();
        Self {
            fastapi_mode: fastapi_mode.as_str().to_string(),
            fastapi_agent: fastapi_detection.is_agent,
            fastapi_ci: fastapi_detection.is_ci,
            fastapi_tty: fastapi_detection.is_tty,
            sqlmodel_mode: sqlmodel_mode.as_str().to_string(),
            sqlmodel_agent: SqlModelOutputMode::is_agent_environment(),
        }
    }

    /// Plain console integration, for tests and piped runs.
    #[must_use]
    pub fn plain() -> Self {
        Self {
            fastapi_mode: "plain".to_string(),
            fastapi_agent: false,
            fastapi_ci: false,
            fastapi_tty: false,
            sqlmodel_mode: "plain".to_string(),
            sqlmodel_agent: false,
        }
    }

    #[must_use]
    pub fn should_emit_json(&self) -> bool {
        self.sqlmodel_mode == "json"
    }
}

#[derive(Debug, Clone)]
pub struct CliOutput {
    inner: RichOutput,
    enabled: bool,
}

impl CliOutput {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            inner: RichOutput::auto(),
            enabled,
        }
    }

    pub fn rule(&self, title: Option<&str>) {
        if self.enabled {
            self.inner.rule(title);
        }
    }

    pub fn info(&self, message: &str) {
        if self.enabled {
            self.inner.info(message);
        }
    }

    pub fn success(&self, message: &str) {
        if self.enabled {
            self.inner.success(message);
        }
    }

    pub fn warning(&self, message: &str) {
        if self.enabled {
            self.inner.warning(message);
        }
    }

    pub fn error(&self, message: &str) {
        if self.enabled {
            self.inner.error(message);
        }
    }

    /// Multi-line text, one `info` line per line.
    pub fn block(&self, text: &str) {
        for line in text.lines() {
            self.info(line);
        }
    }
}

#[must_use]
pub fn output_for(integration: &OutputIntegration) -> CliOutput {
    CliOutput::new(!integration.should_emit_json())
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)?;
    Ok(())
}

pub fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(DoctorError::MissingPath {
            path: path.to_path_buf(),
        })
    }
}

pub fn write_string(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

/// Load and shape-check a locale tree from a JSON file.
pub fn read_tree(path: &Path) -> Result<ContentTree> {
    ensure_exists(path)?;
    let content = fs::read_to_string(path)?;
    let tree = ContentTree::from_json_str(&content)?;
    tracing::debug!(path = %path.display(), keys = tree.len(), "loaded content tree");
    Ok(tree)
}

/// Load the locale under test. Keys no dotted path can reach are dropped and
/// returned so the report can list them; a document that is not a JSON object
/// still fails.
pub fn read_target_tree(path: &Path) -> Result<(ContentTree, Vec<SkippedKey>)> {
    ensure_exists(path)?;
    let content = fs::read_to_string(path)?;
    let (tree, skipped) = ContentTree::from_json_str_lenient(&content)?;
    tracing::debug!(
        path = %path.display(),
        keys = tree.len(),
        skipped = skipped.len(),
        "loaded target tree"
    );
    Ok((tree, skipped))
}

/// Load a `{ "<category>": ["path", ...] }` inventory.
pub fn read_index(path: &Path) -> Result<CategoryIndex> {
    ensure_exists(path)?;
    let content = fs::read_to_string(path)?;
    Ok(CategoryIndex::from_json_str(&content)?)
}

/// `locales/de.json` → `de`.
#[must_use]
pub fn locale_label(path: &Path) -> String {
    path.file_stem()
        .map_or_else(String::new, |stem| stem.to_string_lossy().into_owned())
}

#[must_use]
pub fn relative_to(base: &Path, path: &Path) -> Option<PathBuf> {
    pathdiff::diff_paths(path, base)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use tempfile::tempdir;

    use crate::error::DoctorError;

    use super::{
        OutputIntegration, ensure_dir, ensure_exists, locale_label, output_for, read_index,
        read_target_tree, read_tree, relative_to, write_string,
    };

    #[test]
    fn output_for_disables_human_output_when_json_mode_requested() {
        let human_integration = OutputIntegration::plain();
        let json_integration = OutputIntegration {
            sqlmodel_mode: "json".to_string(),
            ..human_integration.clone()
        };

        assert!(!output_for(&json_integration).enabled);
        assert!(output_for(&human_integration).enabled);
    }

    #[test]
    fn ensure_dir_creates_nested_directory() {
        let temp = tempdir().expect("tempdir");
        let nested = temp.path().join("a/b/c");
        ensure_dir(&nested).expect("ensure_dir");
        assert!(nested.is_dir());
    }

    #[test]
    fn ensure_exists_reports_missing_path_error() {
        let temp = tempdir().expect("tempdir");
        let missing = temp.path().join("does-not-exist");
        let error = ensure_exists(&missing).expect_err("missing path should error");
        assert!(matches!(error, DoctorError::MissingPath { path } if path == missing));
    }

    #[test]
    fn write_string_creates_parent_dirs_and_writes_content() {
        let temp = tempdir().expect("tempdir");
        let target = temp.path().join("nested/dir/report.json");
        write_string(&target, "{}").expect("write_string");
        let content = std::fs::read_to_string(&target).expect("read file");
        assert_eq!(content, "{}");
    }

    #[test]
    fn read_tree_rejects_malformed_locale_files() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("de.json");
        write_string(&path, r#"{ "nav.home": "Start" }"#).expect("write");
        let error = read_tree(&path).expect_err("dotted key");
        assert!(matches!(error, DoctorError::I18n(_)));

        write_string(&path, "module.exports = {}").expect("write");
        assert!(read_tree(&path).is_err(), "source text is never evaluated");
    }

    #[test]
    fn read_target_tree_keeps_reachable_keys() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("de.json");
        write_string(&path, r#"{ "nav": { "home": "Start" }, "legacy": { "old.key": "x" } }"#)
            .expect("write");

        let (tree, skipped) = read_target_tree(&path).expect("lenient load");
        assert_eq!(tree.leaf_paths(), vec!["nav.home"]);
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].path, "legacy.old.key");

        write_string(&path, "[]").expect("write");
        assert!(matches!(read_target_tree(&path), Err(DoctorError::I18n(_))));
    }

    #[test]
    fn read_index_reports_missing_file() {
        let temp = tempdir().expect("tempdir");
        let missing = temp.path().join("inventory.json");
        assert!(matches!(
            read_index(&missing),
            Err(DoctorError::MissingPath { .. })
        ));
    }

    #[test]
    fn locale_label_uses_file_stem() {
        assert_eq!(locale_label(Path::new("locales/de.json")), "de");
        assert_eq!(locale_label(Path::new("")), "");
    }

    #[test]
    fn relative_to_returns_path_relative_to_base() {
        let base = Path::new("/tmp/root");
        let target = Path::new("/tmp/root/reports/report.json");
        let relative = relative_to(base, target).expect("relative path");
        assert_eq!(relative, Path::new("reports/report.json"));
    }
}
