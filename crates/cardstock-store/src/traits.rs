use async_trait::async_trait;

use crate::error::StoreResult;

/// Filesystem capability injected by the hosting environment.
///
/// All paths are absolute, forward-slash separated. Every method is
/// fallible and asynchronous; the orchestrator never retries, wraps, or
/// times out capability calls — failures propagate to the caller unchanged.
#[async_trait]
pub trait CardStorage: Send + Sync {
    /// Read a text file. Returns [`StoreError::NotFound`] when the file
    /// does not exist.
    ///
    /// [`StoreError::NotFound`]: crate::StoreError::NotFound
    async fn read_text(&self, path: &str) -> StoreResult<String>;

    /// Write a text file, replacing any existing content.
    async fn write_text(&self, path: &str, contents: &str) -> StoreResult<()>;

    /// Create a directory (and any missing parents). Idempotent.
    async fn ensure_dir(&self, path: &str) -> StoreResult<()>;
}
