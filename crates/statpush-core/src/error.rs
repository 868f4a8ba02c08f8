//! statpush core error type.
//!
//! Adapter crates return `CoreError` directly; the binary wraps it in `anyhow`.

use thiserror::Error;

/// Core layer error.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Required request data missing; raised before any network activity
    #[error("precondition failed for {subject}: {message}")]
    Precondition {
        /// What was checked (e.g. "agent", "component #2 (total_users)")
        subject: String,
        /// Why it failed
        message: String,
    },

    /// The HTTP client could not complete the exchange (DNS, connect, timeout)
    #[error("transport error: {0}")]
    Transport(String),

    /// The source site returned something that is not a statistics document
    #[error("source error: {0}")]
    Source(String),

    /// JSON serialization/deserialization failure
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration value or unreadable/unwritable config file
    #[error("config error: {0}")]
    Config(String),
}

impl CoreError {
    /// Shorthand for a precondition failure
    pub fn precondition(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Precondition {
            subject: subject.into(),
            message: message.into(),
        }
    }

    /// Whether this error was raised by request validation
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition { .. })
    }
}
