use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::{MediaError, Result};
use crate::traits::{ByteSource, HandleFactory};

/// In-memory byte source for tests and embedding.
///
/// Clones share the same underlying file map.
#[derive(Clone, Default)]
pub struct MemoryByteSource {
    files: Arc<RwLock<HashMap<String, Bytes>>>,
}

impl MemoryByteSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the source with a resource at the given absolute path.
    pub fn put(&self, path: &str, data: &[u8]) {
        self.files
            .write()
            .expect("lock poisoned")
            .insert(path.to_string(), Bytes::copy_from_slice(data));
    }
}

#[async_trait]
impl ByteSource for MemoryByteSource {
    async fn read_bytes(&self, path: &str) -> Result<Bytes> {
        let files = self.files.read().expect("lock poisoned");
        files
            .get(path)
            .cloned()
            .ok_or_else(|| MediaError::NotFound(path.to_string()))
    }
}

#[derive(Default)]
struct FactoryState {
    next: AtomicU64,
    live: Mutex<HashSet<String>>,
    revoked: Mutex<Vec<String>>,
}

/// In-memory handle factory issuing `blob:mem/<n>` handles.
///
/// Clones share state, so tests can hold one clone and hand another to a
/// resolver. Failure modes for both primitives are injectable.
#[derive(Clone, Default)]
pub struct MemoryHandleFactory {
    state: Arc<FactoryState>,
    unavailable: bool,
    fail_revocations: bool,
}

impl MemoryHandleFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory whose runtime lacks the handle-creation primitive.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Make every revoke fail, for exercising best-effort release.
    pub fn failing_revocations(mut self) -> Self {
        self.fail_revocations = true;
        self
    }

    /// Handles created and not yet revoked.
    pub fn live_count(&self) -> usize {
        self.state.live.lock().expect("lock poisoned").len()
    }

    /// Handles revoked so far, in revocation order.
    pub fn revoked_handles(&self) -> Vec<String> {
        self.state.revoked.lock().expect("lock poisoned").clone()
    }
}

impl HandleFactory for MemoryHandleFactory {
    fn create(&self, _data: Bytes, _mime: &str) -> Result<String> {
        if self.unavailable {
            return Err(MediaError::HandleFactoryUnavailable);
        }
        let n = self.state.next.fetch_add(1, Ordering::Relaxed);
        let handle = format!("blob:mem/{n}");
        self.state
            .live
            .lock()
            .expect("lock poisoned")
            .insert(handle.clone());
        Ok(handle)
    }

    fn revoke(&self, handle: &str) -> Result<()> {
        if self.fail_revocations {
            return Err(MediaError::Backend(format!("revoke failed: {handle}")));
        }
        let removed = self
            .state
            .live
            .lock()
            .expect("lock poisoned")
            .remove(handle);
        if !removed {
            return Err(MediaError::Backend(format!(
                "unknown or already revoked handle: {handle}"
            )));
        }
        self.state
            .revoked
            .lock()
            .expect("lock poisoned")
            .push(handle.to_string());
        Ok(())
    }
}
