//! Error types for the column engine

use thiserror::Error;

/// Result type alias for column operations
pub type Result<T> = std::result::Result<T, ColumnError>;

/// Errors raised by column persistence
#[derive(Error, Debug)]
pub enum ColumnError {
    /// IO error from the stream layer
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A record's grain count disagrees with the ambient catalog
    #[error("record has {found} grain types but the ambient catalog has {expected}")]
    CatalogMismatch { expected: usize, found: usize },

    /// A record field fails structural validation
    #[error("malformed record: {0}")]
    BadRecord(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for ColumnError {
    fn from(err: anyhow::Error) -> Self {
        ColumnError::Other(err.to_string())
    }
}
