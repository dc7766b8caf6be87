use std::io::ErrorKind;
use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::CardStorage;

/// Storage backend over the real filesystem via `tokio::fs`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsStorage;

impl FsStorage {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CardStorage for FsStorage {
    async fn read_text(&self, path: &str) -> StoreResult<String> {
        match tokio::fs::read_to_string(Path::new(path)).await {
            Ok(text) => Ok(text),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(StoreError::NotFound(path.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn write_text(&self, path: &str, contents: &str) -> StoreResult<()> {
        tokio::fs::write(Path::new(path), contents).await?;
        debug!(path, bytes = contents.len(), "file written");
        Ok(())
    }

    async fn ensure_dir(&self, path: &str) -> StoreResult<()> {
        tokio::fs::create_dir_all(Path::new(path)).await?;
        Ok(())
    }
}
