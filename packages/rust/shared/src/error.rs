//! Error types for StudyBuddy.
//!
//! Library crates use [`StudyBuddyError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all StudyBuddy operations.
#[derive(Debug, thiserror::Error)]
pub enum StudyBuddyError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Transport-level failure talking to the model endpoint.
    #[error("network error: {0}")]
    Network(String),

    /// The model endpoint answered with a non-success status.
    #[error("model API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// The model endpoint answered successfully but without any content.
    #[error("model returned an empty response (model: {model})")]
    EmptyResponse { model: String },

    /// The model's text could not be decoded into the expected structure.
    #[error("invalid JSON response from model: {reason}, raw response: {raw}")]
    MalformedResponse { reason: String, raw: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Input validation error (bad URL, empty question, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, StudyBuddyError>;

impl StudyBuddyError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Create a data-format error keeping the raw model text for diagnosis.
    pub fn malformed(reason: impl std::fmt::Display, raw: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.to_string(),
            raw: raw.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = StudyBuddyError::config("missing API key");
        assert_eq!(err.to_string(), "config error: missing API key");

        let err = StudyBuddyError::Api {
            status: 429,
            body: "rate limited".into(),
        };
        assert_eq!(err.to_string(), "model API returned HTTP 429: rate limited");
    }

    #[test]
    fn malformed_keeps_reason_and_raw() {
        let err = StudyBuddyError::malformed("expected value at line 1 column 1", "Sure! Here it is");
        let msg = err.to_string();
        assert!(msg.contains("expected value at line 1 column 1"));
        assert!(msg.contains("Sure! Here it is"));
    }
}
