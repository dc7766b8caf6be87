use tracing::{debug, warn};

use cardstock_path::normalize_path;

use crate::error::Result;
use crate::mime::mime_for_path;
use crate::traits::{ByteSource, HandleFactory};

/// How a [`ResolvedResource`] was produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceOrigin {
    /// Bytes were fetched and wrapped in a revocable blob handle.
    Blob,
    /// The reference was already directly consumable; nothing to revoke.
    Direct,
}

/// A runtime-consumable resource reference, owned by the caller.
///
/// Created by [`MediaResolver::resolve`] (or
/// [`MediaResolver::pass_through`]) and released exactly once via
/// [`MediaResolver::release`]; never garbage-collected implicitly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedResource {
    /// Absolute path the resource was resolved from.
    pub full_path: String,
    /// Opaque runtime handle (e.g. a short-lived URL).
    pub handle: String,
    pub origin: ResourceOrigin,
}

/// Join a card root and a relative resource path into one absolute path.
///
/// Separators are normalized on both sides. An empty `resource_path` yields
/// the root unchanged, and an empty `card_root` yields the resource path
/// unchanged (both normalized).
pub fn build_full_path(card_root: &str, resource_path: &str) -> String {
    let root = normalize_path(card_root);
    let resource = normalize_path(resource_path);
    if resource.is_empty() {
        return root;
    }
    if root.is_empty() {
        return resource;
    }
    format!("{}/{}", root, resource.trim_start_matches('/'))
}

/// Resolves absolute resource paths to revocable runtime handles.
pub struct MediaResolver<S, F> {
    source: S,
    factory: F,
}

impl<S: ByteSource, F: HandleFactory> MediaResolver<S, F> {
    pub fn new(source: S, factory: F) -> Self {
        Self { source, factory }
    }

    /// Resolve an absolute path to a fresh blob-backed handle.
    ///
    /// Each call is an independent resolution: resolving the same path
    /// twice yields two handles, each owing its own release. Capability
    /// failures propagate unchanged; an unavailable handle factory is
    /// fatal, not retried.
    pub async fn resolve(&self, full_path: &str) -> Result<ResolvedResource> {
        let data = self.source.read_bytes(full_path).await?;
        let mime = mime_for_path(full_path);
        let handle = self.factory.create(data, mime)?;
        debug!(path = %full_path, mime, handle = %handle, "resource resolved");
        Ok(ResolvedResource {
            full_path: full_path.to_string(),
            handle,
            origin: ResourceOrigin::Blob,
        })
    }

    /// Wrap an already-direct reference (network/blob/data URI) unchanged.
    pub fn pass_through(&self, url: &str) -> ResolvedResource {
        ResolvedResource {
            full_path: url.to_string(),
            handle: url.to_string(),
            origin: ResourceOrigin::Direct,
        }
    }

    /// Release a resolved resource, best-effort.
    ///
    /// Revocation failures are logged and swallowed; release never fails
    /// and never blocks the caller from proceeding. The resource is
    /// consumed: every resolve owns exactly one release, and a second
    /// release is unrepresentable.
    pub fn release(&self, resource: ResolvedResource) {
        match resource.origin {
            ResourceOrigin::Blob => {
                if let Err(err) = self.factory.revoke(&resource.handle) {
                    warn!(handle = %resource.handle, error = %err, "handle revoke failed; ignoring");
                }
            }
            ResourceOrigin::Direct => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MediaError;
    use crate::memory::{MemoryByteSource, MemoryHandleFactory};

    fn resolver_with(path: &str, bytes: &[u8]) -> MediaResolver<MemoryByteSource, MemoryHandleFactory> {
        let source = MemoryByteSource::new();
        source.put(path, bytes);
        MediaResolver::new(source, MemoryHandleFactory::new())
    }

    #[test]
    fn build_full_path_joins_and_normalizes() {
        assert_eq!(
            build_full_path("/ws/card-001", "gallery\\a.jpg"),
            "/ws/card-001/gallery/a.jpg"
        );
        assert_eq!(build_full_path("/ws/card-001/", ""), "/ws/card-001");
        assert_eq!(build_full_path("", "gallery/a.jpg"), "gallery/a.jpg");
    }

    #[tokio::test]
    async fn resolve_produces_blob_handle_with_inferred_mime() {
        let resolver = resolver_with("/c/cover.png", b"\x89PNG");
        let resource = resolver.resolve("/c/cover.png").await.unwrap();
        assert_eq!(resource.origin, ResourceOrigin::Blob);
        assert_eq!(resource.full_path, "/c/cover.png");
        assert!(resource.handle.starts_with("blob:mem/"));
    }

    #[tokio::test]
    async fn repeated_resolves_yield_distinct_handles() {
        let resolver = resolver_with("/c/cover.png", b"img");
        let first = resolver.resolve("/c/cover.png").await.unwrap();
        let second = resolver.resolve("/c/cover.png").await.unwrap();
        assert_ne!(first.handle, second.handle);
    }

    #[tokio::test]
    async fn missing_resource_is_not_found() {
        let resolver = resolver_with("/c/cover.png", b"img");
        let err = resolver.resolve("/c/other.png").await.unwrap_err();
        assert!(matches!(err, MediaError::NotFound(_)));
    }

    #[tokio::test]
    async fn unavailable_factory_is_fatal() {
        let source = MemoryByteSource::new();
        source.put("/c/a.png", b"img");
        let resolver = MediaResolver::new(source, MemoryHandleFactory::unavailable());
        let err = resolver.resolve("/c/a.png").await.unwrap_err();
        assert!(matches!(err, MediaError::HandleFactoryUnavailable));
        assert_eq!(err.to_string(), "runtime handle creation is unavailable");
    }

    #[tokio::test]
    async fn release_revokes_blob_handles() {
        let source = MemoryByteSource::new();
        source.put("/c/a.png", b"img");
        let factory = MemoryHandleFactory::new();
        let resolver = MediaResolver::new(source, factory.clone());
        let resource = resolver.resolve("/c/a.png").await.unwrap();
        let handle = resource.handle.clone();
        resolver.release(resource);
        assert_eq!(factory.revoked_handles(), vec![handle]);
        assert_eq!(factory.live_count(), 0);
    }

    #[tokio::test]
    async fn release_swallows_revoke_failures() {
        let source = MemoryByteSource::new();
        source.put("/c/a.png", b"img");
        let resolver = MediaResolver::new(source, MemoryHandleFactory::new().failing_revocations());
        let resource = resolver.resolve("/c/a.png").await.unwrap();
        // Must not panic or surface the failure.
        resolver.release(resource);
    }

    #[test]
    fn pass_through_release_is_a_no_op() {
        let resolver = MediaResolver::new(MemoryByteSource::new(), MemoryHandleFactory::new());
        let resource = resolver.pass_through("https://x/y.jpg");
        assert_eq!(resource.origin, ResourceOrigin::Direct);
        assert_eq!(resource.handle, "https://x/y.jpg");
        resolver.release(resource);
    }
}
