use thiserror::Error;

/// Errors from content document construction and serialization.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The type tag was empty after trimming. Programmer error; the fixed
    /// message keeps it greppable.
    #[error("content document precondition violated: type tag must be non-empty")]
    EmptyKind,

    /// Serialization failure (should not occur for well-formed documents).
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result alias for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
