//! Error types for mergebase-core

/// Errors specific to mergebase-core
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid commit id: {0:?}")]
    InvalidCommitId(String),

    #[error("Unix timestamp out of range: {0}")]
    TimestampOutOfRange(i64),
}
