use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

/// Byte-read capability injected by the hosting environment.
#[async_trait]
pub trait ByteSource: Send + Sync {
    /// Fetch the raw bytes of the resource at an absolute path.
    ///
    /// Returns [`MediaError::NotFound`] when nothing exists at the path;
    /// all other failures are propagated unchanged.
    ///
    /// [`MediaError::NotFound`]: crate::MediaError::NotFound
    async fn read_bytes(&self, path: &str) -> Result<Bytes>;
}

/// Short-lived handle creation and revocation, injected by the runtime.
///
/// Handles stand in for blob bytes (e.g. object URLs) and stay valid until
/// revoked. A runtime without this primitive reports
/// [`MediaError::HandleFactoryUnavailable`] from `create`.
///
/// [`MediaError::HandleFactoryUnavailable`]: crate::MediaError::HandleFactoryUnavailable
pub trait HandleFactory: Send + Sync {
    /// Wrap typed blob bytes in a fresh revocable handle.
    ///
    /// Every call yields a distinct handle, even for identical bytes.
    fn create(&self, data: Bytes, mime: &str) -> Result<String>;

    /// Revoke a handle previously returned by [`create`](Self::create).
    ///
    /// Revoking the same handle twice is undefined; callers own exactly
    /// one revoke per create.
    fn revoke(&self, handle: &str) -> Result<()>;
}
