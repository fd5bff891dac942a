//! Error types for KOSIFT

use thiserror::Error;

/// Result type alias for KOSIFT operations
pub type Result<T> = std::result::Result<T, KosiftError>;

/// Main error type for KOSIFT
#[derive(Error, Debug)]
pub enum KosiftError {
    /// Malformed report line (wrong field count or unparseable numeric field).
    /// Fatal to the current parse; no partial records are emitted.
    #[error("report line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Reference table is missing required columns, or parallel multi-value
    /// lists within a row have unequal lengths
    #[error("reference table schema mismatch: {0}")]
    Schema(String),

    /// A threshold spec text form does not match `value|kind`, or the kind is
    /// not one of `full` / `domain`
    #[error("invalid threshold spec '{value}': {reason}")]
    Format { value: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl KosiftError {
    /// Create a parse error for a report line
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// Create a schema mismatch error
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    /// Create a threshold spec format error
    pub fn format(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Format {
            value: value.into(),
            reason: reason.into(),
        }
    }
}
