//! File-based defaults for `doctor_praxis`.
//!
//! ```toml
//! # praxis-i18n.toml
//! reference = "locales/en.json"
//! target = "locales/de.json"
//! categories = "locales/inventory.json"
//! output_json = "target/locale-check/report.json"
//! type_errors_fail = true
//! sample_size = 5
//! ```
//!
//! Relative paths are taken relative to the config file. Command-line flags
//! override every value.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DoctorError, Result};

pub const DEFAULT_CONFIG_FILE: &str = "praxis-i18n.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoctorConfig {
    pub reference: Option<PathBuf>,
    pub target: Option<PathBuf>,
    pub categories: Option<PathBuf>,
    pub output_json: Option<PathBuf>,
    pub output_html: Option<PathBuf>,
    pub reference_locale: Option<String>,
    pub target_locale: Option<String>,
    pub type_errors_fail: bool,
    pub sample_size: usize,
}

impl Default for DoctorConfig {
    fn default() -> Self {
        Self {
            reference: None,
            target: None,
            categories: None,
            output_json: None,
            output_html: None,
            reference_locale: None,
            target_locale: None,
            type_errors_fail: true,
            sample_size: 5,
        }
    }
}

impl DoctorConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Load a config file, resolving its relative paths against its own
    /// directory.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|error| {
            if error.kind() == std::io::ErrorKind::NotFound {
                DoctorError::MissingPath {
                    path: path.to_path_buf(),
                }
            } else {
                DoctorError::Io(error)
            }
        })?;
        let config = Self::from_toml_str(&content)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.rebased(base))
    }

    /// An explicit path must exist; otherwise `praxis-i18n.toml` in the
    /// working directory is used when present.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            tracing::debug!(path = %path.display(), "loading config");
            return Self::from_toml_file(path);
        }

        let implicit = Path::new(DEFAULT_CONFIG_FILE);
        if implicit.is_file() {
            tracing::debug!(path = DEFAULT_CONFIG_FILE, "loading config from working directory");
            Self::from_toml_file(implicit)
        } else {
            Ok(Self::default())
        }
    }

    #[must_use]
    pub fn rebased(mut self, base: &Path) -> Self {
        let rebase = |path: Option<PathBuf>| path.map(|p| if p.is_absolute() { p } else { base.join(p) });
        self.reference = rebase(self.reference);
        self.target = rebase(self.target);
        self.categories = rebase(self.categories);
        self.output_json = rebase(self.output_json);
        self.output_html = rebase(self.output_html);
        self
    }

    /// Problems that make the config unusable on its own. Missing inputs
    /// are reported here but may still be supplied on the command line.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.reference.is_none() {
            errors.push("reference must be set".into());
        }
        if self.target.is_none() {
            errors.push("target must be set".into());
        }
        if self.sample_size == 0 {
            errors.push("sample_size must be > 0".into());
        }
        errors
    }
}
