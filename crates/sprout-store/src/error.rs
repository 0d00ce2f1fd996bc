//! Error types for sprout-store.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the store abstraction and local flag persistence.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The backing store rejected an operation.
    #[error("store rejected operation on '{path}': {message}")]
    Rejected {
        /// Logical path the operation targeted.
        path: String,
        /// Backend-supplied description.
        message: String,
    },

    /// Failed to read the flags file.
    #[error("failed to read flags file {path}")]
    FlagsRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse the flags file.
    #[error("failed to parse flags file {path}")]
    FlagsParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Failed to serialize flag state.
    #[error("failed to serialize flag state")]
    FlagsSerialize(#[source] serde_json::Error),

    /// Failed to write the flags file.
    #[error("failed to write flags file {path}")]
    FlagsWrite {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type alias using sprout-store's [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;
