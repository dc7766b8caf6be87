use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::block::BlockEntry;
use crate::id::CardId;

/// Descriptive metadata of a card.
///
/// Immutable except through explicit update by the hosting editor; the
/// storage layer only reads and persists it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardMetadata {
    pub name: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl CardMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            tags: Vec::new(),
            created_at: now,
            modified_at: now,
        }
    }
}

/// A card document: metadata plus an ordered sequence of blocks.
///
/// The order of `structure` is semantically significant (render/tab order)
/// and is preserved across save and load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardDocument {
    pub id: CardId,
    pub metadata: CardMetadata,
    pub structure: Vec<BlockEntry>,
    /// Last directory this card was saved to, when known.
    pub file_path: Option<String>,
    pub is_modified: bool,
    pub last_modified: DateTime<Utc>,
}

impl CardDocument {
    pub fn new(id: impl Into<CardId>, name: impl Into<String>) -> Self {
        let metadata = CardMetadata::new(name);
        let last_modified = metadata.modified_at;
        Self {
            id: id.into(),
            metadata,
            structure: Vec::new(),
            file_path: None,
            is_modified: false,
            last_modified,
        }
    }

    pub fn block_count(&self) -> usize {
        self.structure.len()
    }

    /// Return a new card with `block` spliced into the structure at `index`.
    ///
    /// `index` is clamped to `[0, structure.len()]`. The original card is
    /// left untouched; callers still holding it observe no change. The
    /// snapshot's `last_modified` is strictly greater than the original's,
    /// even when the wall clock has not advanced.
    #[must_use]
    pub fn with_block_inserted(&self, block: BlockEntry, index: usize) -> CardDocument {
        let at = index.min(self.structure.len());
        let mut structure = Vec::with_capacity(self.structure.len() + 1);
        structure.extend_from_slice(&self.structure[..at]);
        structure.push(block);
        structure.extend_from_slice(&self.structure[at..]);

        let now = Utc::now();
        let last_modified = if now > self.last_modified {
            now
        } else {
            self.last_modified + Duration::milliseconds(1)
        };

        CardDocument {
            id: self.id.clone(),
            metadata: self.metadata.clone(),
            structure,
            file_path: self.file_path.clone(),
            is_modified: true,
            last_modified,
        }
    }
}
