use thiserror::Error;

/// Errors raised while parsing a struct tag literal
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    #[error("empty tag key at byte {0}")]
    EmptyKey(usize),

    #[error("tag key {0:?} is not followed by ':'")]
    MissingColon(String),

    #[error("value of tag key {0:?} is not quoted")]
    MissingQuote(String),

    #[error("unterminated quoted value for tag key {0:?}")]
    Unterminated(String),

    #[error("duplicate tag key {0:?}")]
    DuplicateKey(String),
}

pub type Result<T> = std::result::Result<T, TagError>;
