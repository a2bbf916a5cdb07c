//! Typed error handling for critcss.
//!
//! The pruning passes themselves never fail: unparseable media queries are
//! dropped and unknown value shapes are skipped. Errors only surface at the
//! edges of the pipeline, when reading CSS text, loading configuration, or
//! talking to the rendering probe.

use thiserror::Error;

/// Main error type for critcss operations.
#[derive(Error, Debug)]
pub enum CriticalError {
    /// CSS source could not be read into an AST
    #[error("Parse error at {line}:{column}: {message}")]
    Parse {
        message: String,
        /// Line number (1-indexed)
        line: usize,
        /// Column number (1-indexed)
        column: usize,
    },

    /// Configuration errors (match configs, pipeline options)
    #[error("Config error: {message}")]
    Config { message: String },

    /// The rendering probe failed or replied with an unexpected shape
    #[error("Probe error: {message}")]
    Probe {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Invalid argument provided
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl CriticalError {
    /// Create a parse error with line/column info.
    pub fn parse_at(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::Parse {
            message: message.into(),
            line,
            column,
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a probe error.
    pub fn probe(message: impl Into<String>) -> Self {
        Self::Probe {
            message: message.into(),
            source: None,
        }
    }

    /// Create a probe error caused by a malformed reply.
    pub fn probe_reply(err: serde_json::Error) -> Self {
        Self::Probe {
            message: format!("unexpected probe reply: {}", err),
            source: Some(err),
        }
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error (the caller can fall back to
    /// serving the full stylesheet).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::Probe { .. })
    }

    /// Get the source location associated with this error, if any.
    pub fn location(&self) -> Option<(usize, usize)> {
        match self {
            Self::Parse { line, column, .. } => Some((*line, *column)),
            _ => None,
        }
    }
}

/// Convenience type alias for critcss results.
pub type CriticalResult<T> = Result<T, CriticalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_with_location() {
        let err = CriticalError::parse_at("unclosed block", 10, 5);
        if let CriticalError::Parse { line, column, .. } = &err {
            assert_eq!(*line, 10);
            assert_eq!(*column, 5);
        } else {
            panic!("Expected Parse error");
        }
        assert_eq!(err.location(), Some((10, 5)));
        assert!(err.to_string().contains("10:5"));
    }

    #[test]
    fn test_probe_reply_error_keeps_source() {
        let json_err = serde_json::from_str::<Vec<String>>("[1, 2]").unwrap_err();
        let err = CriticalError::probe_reply(json_err);
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("Probe error"));
    }

    #[test]
    fn test_is_recoverable() {
        assert!(CriticalError::parse_at("error", 1, 1).is_recoverable());
        assert!(CriticalError::probe("timeout").is_recoverable());
        assert!(!CriticalError::config("bad width").is_recoverable());
        assert!(!CriticalError::invalid_argument("negative").is_recoverable());
    }
}
