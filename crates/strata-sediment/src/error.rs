//! Error types for catalog construction

use thiserror::Error;

/// Result type alias for sediment-catalog operations
pub type Result<T> = std::result::Result<T, SedimentError>;

/// Errors raised while scanning or validating a sediment catalog
#[derive(Error, Debug)]
pub enum SedimentError {
    /// A mandatory key is absent from a group
    #[error("sediment group '{group}': missing key '{key}'")]
    MissingKey { group: String, key: &'static str },

    /// A value could not be parsed as a number
    #[error("sediment group '{group}': invalid value '{value}' for key '{key}'")]
    InvalidValue {
        group: String,
        key: &'static str,
        value: String,
    },

    /// A value lies outside its physical bounds
    #[error("sediment group '{group}': {what} = {value} outside [{min}, {max}]")]
    OutOfRange {
        group: String,
        what: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A group header line could not be parsed
    #[error("malformed sediment group header: {0:?}")]
    MalformedHeader(String),

    /// The source contained no sediment groups
    #[error("no sediment groups found in configuration")]
    EmptyCatalog,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
