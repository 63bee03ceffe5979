//! Error types for formgen-core.

use thiserror::Error;

/// Result type for formgen-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in formgen-core.
#[derive(Debug, Error)]
pub enum Error {
    /// Annotation shape outside the recognized set, surfaced at schema-build time.
    #[error("unsupported annotation: {0}")]
    UnsupportedAnnotation(String),

    /// Optional plotting/conversion library absent, surfaced at first figure conversion.
    #[error("missing optional dependency: {0}")]
    MissingDependency(String),

    /// Runtime return value does not match the declared return kind.
    #[error("return value does not match declared kind: expected {expected}")]
    ValueMismatch { expected: &'static str },

    /// Declared return arity does not cover an actual result position.
    #[error("declared return arity {declared} does not cover result position {position}")]
    ArityMismatch { declared: usize, position: usize },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Static resource persistence failed in the storage collaborator.
    #[error("resource persistence failed: {0}")]
    Persistence(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
