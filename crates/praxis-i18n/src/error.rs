use thiserror::Error;

pub type Result<T> = std::result::Result<T, I18nError>;

/// Failures raised while loading or validating content trees.
///
/// Lookups never produce these: absence is a value, not an error. Only
/// unrepresentable input (too deep to be a finite authored tree, malformed
/// keys, conflicting inventories) is reported here.
#[derive(Debug, Error)]
pub enum I18nError {
    #[error("structural error at '{path}': nesting exceeds depth {depth}")]
    Structural { path: String, depth: usize },

    #[error("invalid content at '{path}': {reason}")]
    InvalidContent { path: String, reason: String },

    #[error("key '{path}' is listed under both '{first}' and '{second}'")]
    AmbiguousCategory {
        path: String,
        first: String,
        second: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl I18nError {
    #[must_use]
    pub fn invalid(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidContent {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error aborts a validation pass outright.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Structural { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::I18nError;

    #[test]
    fn invalid_constructor_renders_path_and_reason() {
        let error = I18nError::invalid("a.b", "empty key");
        assert_eq!(error.to_string(), "invalid content at 'a.b': empty key");
        assert!(!error.is_structural());
    }

    #[test]
    fn structural_error_is_flagged() {
        let error = I18nError::Structural {
            path: "x.y".to_string(),
            depth: 64,
        };
        assert!(error.is_structural());
        assert!(error.to_string().contains("depth 64"));
    }
}
