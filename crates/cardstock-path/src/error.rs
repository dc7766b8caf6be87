use thiserror::Error;

/// Errors from path resolution.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// Neither a card id nor an explicit path was supplied to a resolution
    /// call that requires one. This is a programmer error in the caller,
    /// not a recoverable condition; the fixed prefix keeps it greppable.
    #[error("card path precondition violated: no card id or explicit path ({context})")]
    MissingIdentity { context: String },
}

/// Result alias for path operations.
pub type Result<T> = std::result::Result<T, PathError>;
