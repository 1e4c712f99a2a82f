use thiserror::Error;

use crate::transform::UnknownTransform;

/// Configuration-specific errors, all raised before the source is touched
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("one of --struct, --line, --offset or --all must be given")]
    NoSelection,

    #[error("only one of --struct, --line, --offset or --all may be given (got {0})")]
    MultipleSelections(String),

    #[error("invalid line selection {0:?}: expected N or N,M with N >= 1")]
    InvalidLine(String),

    #[error("wrong range: start line {start} is larger than end line {end}")]
    InvalidRange { start: usize, end: usize },

    #[error("one of add, add-options, remove, remove-options, clear or clear-options must be given")]
    NoOperation,

    #[error("invalid tag key {0:?}")]
    InvalidKey(String),

    #[error("invalid literal {0:?}: expected key:value")]
    InvalidLiteral(String),

    #[error("invalid option {0:?}: expected key=option")]
    InvalidOption(String),

    #[error(transparent)]
    UnknownTransform(#[from] UnknownTransform),

    #[error("unknown output format {0:?} (expected source or json)")]
    UnknownFormat(String),

    #[error("Failed to read configuration file: {0}")]
    ReadFailed(String),

    #[error("Failed to parse TOML: {0}")]
    ParseFailed(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
