use std::path::PathBuf;

use praxis_i18n::I18nError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DoctorError>;

/// Findings failed, or inputs could not be read.
pub const EXIT_FAILED: i32 = 1;
/// A content tree nests past the supported depth. Clap keeps 2 for usage errors.
pub const EXIT_STRUCTURAL: i32 = 3;

#[derive(Debug, Error)]
pub enum DoctorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("content error: {0}")]
    I18n(#[from] I18nError),

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("required path does not exist: {path}")]
    MissingPath { path: PathBuf },

    #[error("{message}")]
    Exit { code: i32, message: String },
}

impl DoctorError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Exit { code, .. } => *code,
            Self::I18n(error) if error.is_structural() => EXIT_STRUCTURAL,
            _ => EXIT_FAILED,
        }
    }

    /// Stable tag for the JSON error envelope.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io(_) | Self::MissingPath { .. } => "input",
            Self::Json(_) | Self::Toml(_) | Self::InvalidArgument { .. } => "usage",
            Self::I18n(error) if error.is_structural() => "structural",
            Self::I18n(_) => "content",
            Self::Exit { .. } => "check_failed",
        }
    }

    #[must_use]
    pub fn exit(code: i32, message: impl Into<String>) -> Self {
        Self::Exit {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}
