use thiserror::Error;

use crate::tag::TagError;

/// Main application error type that aggregates domain-specific errors
#[derive(Error, Debug)]
pub enum RetagError {
    /// Configuration layer errors
    #[error(transparent)]
    Config(#[from] crate::config::error::ConfigError),

    /// Go source errors
    #[error(transparent)]
    Parse(#[from] crate::parser::error::ParseError),

    /// Field selection errors
    #[error(transparent)]
    Select(#[from] crate::selector::SelectError),

    /// A selected field carries a malformed tag literal
    #[error("invalid tag on field {field} at line {line}: {source}")]
    InvalidTag {
        field: String,
        line: usize,
        #[source]
        source: TagError,
    },

    /// Modified-files archive errors
    #[error(transparent)]
    Archive(#[from] crate::source::ArchiveError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic I/O errors not covered by specific layers
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for retag operations
pub type Result<T> = std::result::Result<T, RetagError>;
