//! Error types for geoscope.

use thiserror::Error;

use crate::classification::Classification;

/// The main error type for geoscope operations.
#[derive(Error, Debug)]
pub enum GeoscopeError {
    /// A required argument was missing or malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An operation was requested in a classification that does not support it.
    #[error("cannot {operation} while classification is {classification}")]
    InvalidClassification {
        operation: &'static str,
        classification: Classification,
    },

    /// An outline instance was requested for an entity that is not outlined.
    #[error("entity '{0}' is not outlined")]
    NotOutlined(String),

    /// Geometry options failed validation.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// The updater was used after being disposed.
    #[error("geometry updater for entity '{0}' has been disposed")]
    Disposed(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for geoscope operations.
pub type Result<T> = std::result::Result<T, GeoscopeError>;
