use thiserror::Error;

/// Errors from card persistence operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Capability failure, carrying the capability's message unchanged.
    #[error("{0}")]
    Backend(String),

    /// The requested file does not exist in the storage backend.
    #[error("file not found: {0}")]
    NotFound(String),

    /// A package file exists but cannot be decoded.
    #[error("corrupt package file {path}: {reason}")]
    Corrupt { path: String, reason: String },

    /// Path resolution precondition failure.
    #[error(transparent)]
    Path(#[from] cardstock_path::PathError),

    /// Content document construction failure.
    #[error(transparent)]
    Codec(#[from] cardstock_codec::CodecError),

    /// Serialization failure while producing a package file.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// I/O error from a filesystem-backed storage.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
