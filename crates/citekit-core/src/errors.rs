//! Error types for citekit-core.
//!
//! Citation resolution never fails: unmatched or fabricated references degrade
//! to unresolved citations. The variants below cover malformed *inputs* to the
//! library (unreadable configuration, result payloads that are not valid JSON).

use std::path::PathBuf;

use thiserror::Error;

/// Domain-specific errors for citekit operations.
#[derive(Error, Debug)]
pub enum CiteError {
    /// Configuration file could not be read.
    #[error("Config not readable at `{path}`: {message}")]
    ConfigRead {
        /// Path to the configuration file.
        path: PathBuf,
        /// Description of the I/O failure.
        message: String,
    },

    /// Configuration file could not be parsed.
    #[error("Config invalid at `{path}`: {message}")]
    ConfigParse {
        /// Path to the configuration file.
        path: PathBuf,
        /// Description of the parse failure.
        message: String,
    },

    /// A configuration value is invalid.
    #[error("Invalid configuration: {message}. {hint}")]
    InvalidConfiguration {
        /// Description of the invalid configuration.
        message: String,
        /// Actionable hint on how to fix it.
        hint: String,
    },

    /// Unknown citation strategy name.
    #[error("Unknown citation strategy `{0}`. Use `position` or `aggregator`.")]
    UnknownStrategy(String),

    /// A caller supplied input that cannot be processed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A wrapped generic error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_configuration_message_includes_hint() {
        let err = CiteError::InvalidConfiguration {
            message: "missingIndexMarker contains a newline".to_string(),
            hint: "Use a single-line marker such as `???`".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("missingIndexMarker"));
        assert!(msg.contains("single-line marker"));
    }

    #[test]
    fn test_json_error_converts() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json");
        let err: CiteError = parse.unwrap_err().into();
        assert!(matches!(err, CiteError::Json(_)));
    }
}
