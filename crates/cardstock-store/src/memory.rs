use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::{StoreError, StoreResult};
use crate::traits::CardStorage;

#[derive(Default)]
struct MemoryState {
    files: RwLock<HashMap<String, String>>,
    dirs: RwLock<HashSet<String>>,
    write_counts: RwLock<HashMap<String, u32>>,
    fail_writes: RwLock<Option<String>>,
}

/// In-memory storage backend for tests and embedding.
///
/// Clones share state, so a test can hand one clone to a [`CardStore`] and
/// inspect written files through another. Write failures are injectable for
/// exercising error propagation.
///
/// [`CardStore`]: crate::CardStore
#[derive(Clone, Default)]
pub struct MemoryStorage {
    state: Arc<MemoryState>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with exactly this message.
    pub fn fail_writes_with(&self, message: &str) {
        *self.state.fail_writes.write().expect("lock poisoned") = Some(message.to_string());
    }

    /// Stop failing writes.
    pub fn heal_writes(&self) {
        *self.state.fail_writes.write().expect("lock poisoned") = None;
    }

    /// Contents of a written file, if present.
    pub fn file(&self, path: &str) -> Option<String> {
        self.state
            .files
            .read()
            .expect("lock poisoned")
            .get(path)
            .cloned()
    }

    pub fn dir_exists(&self, path: &str) -> bool {
        self.state
            .dirs
            .read()
            .expect("lock poisoned")
            .contains(path)
    }

    /// How many times a path has been written.
    pub fn write_count(&self, path: &str) -> u32 {
        self.state
            .write_counts
            .read()
            .expect("lock poisoned")
            .get(path)
            .copied()
            .unwrap_or(0)
    }

    /// Number of files currently stored.
    pub fn file_count(&self) -> usize {
        self.state.files.read().expect("lock poisoned").len()
    }

    /// Seed a file directly, bypassing the failure hook.
    pub fn put_file(&self, path: &str, contents: &str) {
        self.state
            .files
            .write()
            .expect("lock poisoned")
            .insert(path.to_string(), contents.to_string());
    }

    /// Remove a file, returning `true` if it existed.
    pub fn remove_file(&self, path: &str) -> bool {
        self.state
            .files
            .write()
            .expect("lock poisoned")
            .remove(path)
            .is_some()
    }
}

#[async_trait]
impl CardStorage for MemoryStorage {
    async fn read_text(&self, path: &str) -> StoreResult<String> {
        self.file(path)
            .ok_or_else(|| StoreError::NotFound(path.to_string()))
    }

    async fn write_text(&self, path: &str, contents: &str) -> StoreResult<()> {
        if let Some(message) = self.state.fail_writes.read().expect("lock poisoned").clone() {
            return Err(StoreError::Backend(message));
        }
        self.state
            .files
            .write()
            .expect("lock poisoned")
            .insert(path.to_string(), contents.to_string());
        *self
            .state
            .write_counts
            .write()
            .expect("lock poisoned")
            .entry(path.to_string())
            .or_insert(0) += 1;
        Ok(())
    }

    async fn ensure_dir(&self, path: &str) -> StoreResult<()> {
        self.state
            .dirs
            .write()
            .expect("lock poisoned")
            .insert(path.to_string());
        Ok(())
    }
}
