use thiserror::Error;

/// Errors from resource handle resolution.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The runtime cannot create revocable handles at all. Fatal for the
    /// resolution path; never retried here.
    #[error("runtime handle creation is unavailable")]
    HandleFactoryUnavailable,

    /// No resource exists at the given path.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// Capability failure, propagated with the capability's own message
    /// unchanged.
    #[error("{0}")]
    Backend(String),

    /// I/O failure from a filesystem-backed byte source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for media operations.
pub type Result<T> = std::result::Result<T, MediaError>;
