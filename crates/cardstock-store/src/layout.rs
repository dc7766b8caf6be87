//! On-disk layout of a card package.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cardstock_types::{BlockEntry, BlockId, CardDocument, CardId};

/// Directory holding metadata and the structure manifest.
pub const PKG_DIR: &str = ".pkg";
/// Directory holding per-block content documents.
pub const CONTENT_DIR: &str = "content";
pub const METADATA_FILE: &str = "metadata.json";
pub const STRUCTURE_FILE: &str = "structure.json";
/// Extension of per-block content files.
pub const CONTENT_EXT: &str = "json";

/// Manifest type tag recorded for blocks whose content is not in memory.
pub const PENDING_KIND: &str = "pending";

pub fn pkg_dir(root: &str) -> String {
    format!("{root}/{PKG_DIR}")
}

pub fn content_dir(root: &str) -> String {
    format!("{root}/{CONTENT_DIR}")
}

pub fn metadata_path(root: &str) -> String {
    format!("{root}/{PKG_DIR}/{METADATA_FILE}")
}

pub fn structure_path(root: &str) -> String {
    format!("{root}/{PKG_DIR}/{STRUCTURE_FILE}")
}

pub fn content_path(root: &str, block_id: &BlockId) -> String {
    format!("{root}/{CONTENT_DIR}/{block_id}.{CONTENT_EXT}")
}

/// `<root>/.pkg/metadata.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetadataFile {
    pub id: CardId,
    pub name: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl MetadataFile {
    pub fn from_card(card: &CardDocument) -> Self {
        Self {
            id: card.id.clone(),
            name: card.metadata.name.clone(),
            tags: card.metadata.tags.clone(),
            created_at: card.metadata.created_at,
            modified_at: card.metadata.modified_at,
        }
    }
}

/// One `{id, type}` pair in the structure manifest, mirroring block order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub id: BlockId,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ManifestEntry {
    pub fn from_block(block: &BlockEntry) -> Self {
        Self {
            id: block.id.clone(),
            kind: block.kind().unwrap_or(PENDING_KIND).to_string(),
        }
    }
}

/// `<root>/.pkg/structure.json`.
///
/// `block_count` always equals the length of `blocks`, which mirrors the
/// card's structure order. `resources` is the sorted set of absolute
/// resource paths collected from every block's configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StructureManifest {
    pub block_count: usize,
    pub resource_count: usize,
    pub resources: Vec<String>,
    pub blocks: Vec<ManifestEntry>,
}
