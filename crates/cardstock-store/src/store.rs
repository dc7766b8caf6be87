use std::collections::BTreeSet;

use serde_json::Value;
use tracing::{debug, info, warn};

use cardstock_codec as codec;
use cardstock_media::build_full_path;
use cardstock_path::{resolve_card_root, WorkspaceRoots};
use cardstock_scan::{collect_resources, ScanRules};
use cardstock_types::{BlockContent, BlockEntry, CardDocument, CardMetadata};

use crate::error::{StoreError, StoreResult};
use crate::layout::{
    content_dir, content_path, metadata_path, pkg_dir, structure_path, ManifestEntry,
    MetadataFile, StructureManifest,
};
use crate::traits::CardStorage;

/// Result of persisting a single block insertion.
#[derive(Clone, Debug, PartialEq)]
pub struct PersistedInsert {
    /// Card root the delta was written under.
    pub persisted_path: String,
    /// The snapshot's block structure after insertion.
    pub next_structure: Vec<BlockEntry>,
}

/// Return a new card with `block` spliced in at the clamped `index`.
///
/// Pure: the original card is never mutated. See
/// [`CardDocument::with_block_inserted`].
pub fn insert_block_snapshot(
    card: &CardDocument,
    block: BlockEntry,
    index: usize,
) -> CardDocument {
    card.with_block_inserted(block, index)
}

/// Orchestrates card package persistence over an injected storage capability.
pub struct CardStore<S> {
    storage: S,
    roots: WorkspaceRoots,
    rules: ScanRules,
}

impl<S: CardStorage> CardStore<S> {
    pub fn new(storage: S, roots: WorkspaceRoots) -> Self {
        Self {
            storage,
            roots,
            rules: ScanRules::default(),
        }
    }

    /// Replace the default resource scan rules.
    pub fn with_rules(mut self, rules: ScanRules) -> Self {
        self.rules = rules;
        self
    }

    /// Save a whole card package, returning the card root written to.
    ///
    /// Target resolution prefers, in order: `path_override`, the card's own
    /// recorded `file_path`, then the id-based fallback under the workspace
    /// root. Steps are not transactional: a failure propagates unchanged
    /// and leaves prior steps' writes in place.
    pub async fn save(
        &self,
        card: &CardDocument,
        path_override: Option<&str>,
    ) -> StoreResult<String> {
        let root = self.card_root(card, path_override);

        self.storage.ensure_dir(&pkg_dir(&root)).await?;
        self.storage.ensure_dir(&content_dir(&root)).await?;

        let metadata = MetadataFile::from_card(card);
        self.storage
            .write_text(&metadata_path(&root), &to_pretty(&metadata)?)
            .await?;

        let manifest = self.build_manifest(&card.structure, &root);
        self.storage
            .write_text(&structure_path(&root), &to_pretty(&manifest)?)
            .await?;

        for block in &card.structure {
            self.write_block(&root, block).await?;
        }

        info!(card = %card.id, root = %root, blocks = card.structure.len(), "card saved");
        Ok(root)
    }

    /// Load a card package into memory, hydrating blocks from their content
    /// files.
    ///
    /// A block whose content file is missing or unparseable stays
    /// [`BlockContent::Pending`]; the failure is logged, not surfaced, and
    /// the load succeeds. Corrupt metadata or manifest files fail the load.
    pub async fn load(
        &self,
        card_id: &str,
        explicit: Option<&str>,
    ) -> StoreResult<CardDocument> {
        let root = resolve_card_root(card_id, explicit, &self.roots);

        let metadata: MetadataFile =
            read_package_file(&self.storage, &metadata_path(&root)).await?;
        let manifest: StructureManifest =
            read_package_file(&self.storage, &structure_path(&root)).await?;

        let mut structure = Vec::with_capacity(manifest.blocks.len());
        for entry in manifest.blocks {
            let path = content_path(&root, &entry.id);
            let content = match self.storage.read_text(&path).await {
                Ok(text) => match codec::parse(&text) {
                    Some(doc) => BlockContent::Hydrated {
                        kind: doc.kind,
                        config: Value::Object(doc.data),
                    },
                    None => {
                        warn!(path = %path, "invalid content document; block stays pending");
                        BlockContent::Pending
                    }
                },
                Err(err) => {
                    warn!(path = %path, error = %err, "content file unreadable; block stays pending");
                    BlockContent::Pending
                }
            };
            structure.push(BlockEntry {
                id: entry.id,
                content,
            });
        }

        info!(card = %metadata.id, root = %root, blocks = structure.len(), "card loaded");
        Ok(CardDocument {
            id: metadata.id,
            metadata: CardMetadata {
                name: metadata.name,
                tags: metadata.tags,
                created_at: metadata.created_at,
                modified_at: metadata.modified_at,
            },
            structure,
            file_path: Some(root),
            is_modified: false,
            last_modified: metadata.modified_at,
        })
    }

    /// Persist a single block insertion as an immutable-snapshot delta.
    ///
    /// Takes the snapshot via [`insert_block_snapshot`], then rewrites only
    /// the structure manifest and the new block's content file; content
    /// files of unchanged blocks are not touched.
    pub async fn persist_inserted_block(
        &self,
        card: &CardDocument,
        block: BlockEntry,
        raw_index: usize,
        path_override: Option<&str>,
    ) -> StoreResult<PersistedInsert> {
        let snapshot = insert_block_snapshot(card, block.clone(), raw_index);
        let root = self.card_root(card, path_override);

        self.storage.ensure_dir(&pkg_dir(&root)).await?;
        self.storage.ensure_dir(&content_dir(&root)).await?;

        let manifest = self.build_manifest(&snapshot.structure, &root);
        self.storage
            .write_text(&structure_path(&root), &to_pretty(&manifest)?)
            .await?;

        self.write_block(&root, &block).await?;

        debug!(card = %card.id, block = %block.id, root = %root, "block insertion persisted");
        Ok(PersistedInsert {
            persisted_path: root,
            next_structure: snapshot.structure,
        })
    }

    /// Resolve the card's target root directory.
    fn card_root(&self, card: &CardDocument, path_override: Option<&str>) -> String {
        let explicit = path_override.or(card.file_path.as_deref());
        resolve_card_root(card.id.as_str(), explicit, &self.roots)
    }

    /// Build the structure manifest: ordering plus resource accounting.
    fn build_manifest(&self, structure: &[BlockEntry], root: &str) -> StructureManifest {
        let mut resources = BTreeSet::new();
        for block in structure {
            resources.extend(collect_resources(block.config(), &self.rules, |raw| {
                build_full_path(root, raw)
            }));
        }
        let resources: Vec<String> = resources.into_iter().collect();
        StructureManifest {
            block_count: structure.len(),
            resource_count: resources.len(),
            resources,
            blocks: structure.iter().map(ManifestEntry::from_block).collect(),
        }
    }

    /// Write one block's content file. Pending blocks are skipped: their
    /// content file on disk is already the source of truth.
    async fn write_block(&self, root: &str, block: &BlockEntry) -> StoreResult<()> {
        let (kind, config) = match &block.content {
            BlockContent::Hydrated { kind, config } => (kind, config),
            BlockContent::Pending => {
                debug!(block = %block.id, "pending block; content file left as-is");
                return Ok(());
            }
        };
        let data = match config.as_object() {
            Some(map) => map.clone(),
            None => {
                warn!(block = %block.id, "non-mapping block config; persisting empty data");
                serde_json::Map::new()
            }
        };
        let doc = codec::create(kind, Some(data))?;
        let text = codec::stringify(&doc)?;
        self.storage
            .write_text(&content_path(root, &block.id), &text)
            .await
    }
}

fn to_pretty<T: serde::Serialize>(value: &T) -> StoreResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

async fn read_package_file<S, T>(storage: &S, path: &str) -> StoreResult<T>
where
    S: CardStorage,
    T: serde::de::DeserializeOwned,
{
    let text = storage.read_text(path).await?;
    serde_json::from_str(&text).map_err(|err| StoreError::Corrupt {
        path: path.to_string(),
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStorage;
    use serde_json::json;

    fn roots() -> WorkspaceRoots {
        WorkspaceRoots::new("/ws")
    }

    fn sample_card() -> CardDocument {
        let mut card = CardDocument::new("card-001.pkg", "Sample");
        card.structure.push(BlockEntry::hydrated(
            "b0",
            "image",
            json!({
                "image_file": "cover.png",
                "gallery": [{ "file_path": "gallery/a.jpg" }],
                "url": "https://x/y.jpg",
            }),
        ));
        card.structure
            .push(BlockEntry::hydrated("b1", "text", json!({ "text": "hi" })));
        card
    }

    fn store(storage: MemoryStorage) -> CardStore<MemoryStorage> {
        CardStore::new(storage, roots())
    }

    #[tokio::test]
    async fn save_writes_the_whole_package() {
        let storage = MemoryStorage::new();
        let card = sample_card();
        let root = store(storage.clone()).save(&card, None).await.unwrap();
        assert_eq!(root, "/ws/card-001");

        assert!(storage.dir_exists("/ws/card-001/.pkg"));
        assert!(storage.dir_exists("/ws/card-001/content"));
        assert!(storage.file("/ws/card-001/.pkg/metadata.json").is_some());
        assert!(storage.file("/ws/card-001/content/b0.json").is_some());
        assert!(storage.file("/ws/card-001/content/b1.json").is_some());

        let manifest: StructureManifest =
            serde_json::from_str(&storage.file("/ws/card-001/.pkg/structure.json").unwrap())
                .unwrap();
        assert_eq!(manifest.block_count, 2);
        assert_eq!(manifest.blocks.len(), 2);
        assert_eq!(manifest.blocks[0].id.as_str(), "b0");
        assert_eq!(manifest.blocks[0].kind, "image");
        assert_eq!(manifest.resource_count, 2);
        assert_eq!(
            manifest.resources,
            vec![
                "/ws/card-001/cover.png".to_string(),
                "/ws/card-001/gallery/a.jpg".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn save_prefers_override_then_recorded_path() {
        let storage = MemoryStorage::new();
        let mut card = sample_card();
        card.file_path = Some("/saved/here".into());

        let store = store(storage.clone());
        assert_eq!(
            store.save(&card, Some("/override")).await.unwrap(),
            "/override"
        );
        assert_eq!(store.save(&card, None).await.unwrap(), "/saved/here");
    }

    #[tokio::test]
    async fn save_failure_propagates_capability_message() {
        let storage = MemoryStorage::new();
        storage.fail_writes_with("save failed");
        let err = store(storage).save(&sample_card(), None).await.unwrap_err();
        assert_eq!(err.to_string(), "save failed");
    }

    #[tokio::test]
    async fn failed_save_leaves_prior_writes_in_place() {
        let storage = MemoryStorage::new();
        let store = store(storage.clone());

        // First save succeeds; then writes start failing and a re-save
        // fails partway without rolling anything back.
        store.save(&sample_card(), None).await.unwrap();
        storage.fail_writes_with("disk full");
        store.save(&sample_card(), None).await.unwrap_err();
        assert!(storage.file("/ws/card-001/.pkg/metadata.json").is_some());
    }

    #[tokio::test]
    async fn save_load_round_trip_preserves_order_and_content() {
        let storage = MemoryStorage::new();
        let card = sample_card();
        let store = store(storage);
        store.save(&card, None).await.unwrap();

        let loaded = store.load("card-001.pkg", None).await.unwrap();
        assert_eq!(loaded.id, card.id);
        assert_eq!(loaded.metadata.name, "Sample");
        assert_eq!(loaded.structure.len(), 2);
        assert_eq!(loaded.structure[0].id.as_str(), "b0");
        assert_eq!(loaded.structure[0].kind(), Some("image"));
        assert_eq!(
            loaded.structure[1].config(),
            Some(&json!({ "text": "hi" }))
        );
        assert_eq!(loaded.file_path.as_deref(), Some("/ws/card-001"));
        assert!(!loaded.is_modified);
    }

    #[tokio::test]
    async fn load_retains_pending_for_missing_content_file() {
        let storage = MemoryStorage::new();
        let store = store(storage.clone());
        store.save(&sample_card(), None).await.unwrap();
        assert!(storage.remove_file("/ws/card-001/content/b0.json"));

        let loaded = store.load("card-001.pkg", None).await.unwrap();
        assert!(loaded.structure[0].is_pending());
        assert_eq!(loaded.structure[1].kind(), Some("text"));
    }

    #[tokio::test]
    async fn load_retains_pending_for_invalid_content_file() {
        let storage = MemoryStorage::new();
        let store = store(storage.clone());
        store.save(&sample_card(), None).await.unwrap();
        // Legacy flat layout: rejected by the codec, not repaired.
        storage.put_file(
            "/ws/card-001/content/b1.json",
            r#"{ "type": "ImageCard", "images": ["a.png"] }"#,
        );

        let loaded = store.load("card-001.pkg", None).await.unwrap();
        assert!(loaded.structure[1].is_pending());
    }

    #[tokio::test]
    async fn load_fails_on_corrupt_manifest() {
        let storage = MemoryStorage::new();
        let store = store(storage.clone());
        store.save(&sample_card(), None).await.unwrap();
        storage.put_file("/ws/card-001/.pkg/structure.json", "not json");

        let err = store.load("card-001.pkg", None).await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn load_fails_on_missing_package() {
        let storage = MemoryStorage::new();
        let err = store(storage).load("card-404.pkg", None).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn persist_inserted_block_rewrites_only_the_delta() {
        let storage = MemoryStorage::new();
        let card = sample_card();
        let store = store(storage.clone());
        store.save(&card, None).await.unwrap();

        let new_block = BlockEntry::hydrated("b-new", "audio", json!({ "audio_file": "s.mp3" }));
        let result = store
            .persist_inserted_block(&card, new_block, 1, None)
            .await
            .unwrap();

        assert_eq!(result.persisted_path, "/ws/card-001");
        let ids: Vec<&str> = result
            .next_structure
            .iter()
            .map(|b| b.id.as_str())
            .collect();
        assert_eq!(ids, vec!["b0", "b-new", "b1"]);

        // Manifest and the new block were rewritten; nothing else was.
        assert_eq!(storage.write_count("/ws/card-001/.pkg/structure.json"), 2);
        assert_eq!(storage.write_count("/ws/card-001/content/b-new.json"), 1);
        assert_eq!(storage.write_count("/ws/card-001/content/b0.json"), 1);
        assert_eq!(storage.write_count("/ws/card-001/content/b1.json"), 1);
        assert_eq!(storage.write_count("/ws/card-001/.pkg/metadata.json"), 1);

        // The original card is untouched.
        assert_eq!(card.structure.len(), 2);

        let manifest: StructureManifest =
            serde_json::from_str(&storage.file("/ws/card-001/.pkg/structure.json").unwrap())
                .unwrap();
        assert_eq!(manifest.block_count, 3);
        assert!(manifest
            .resources
            .contains(&"/ws/card-001/s.mp3".to_string()));
    }

    #[tokio::test]
    async fn fs_backend_round_trips_a_card() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = dir.path().display().to_string();
        let store = CardStore::new(
            crate::fs::FsStorage::new(),
            WorkspaceRoots::new(workspace.as_str()),
        );

        let card = sample_card();
        let root = store.save(&card, None).await.unwrap();
        assert_eq!(root, format!("{workspace}/card-001"));

        let loaded = store.load("card-001.pkg", None).await.unwrap();
        assert_eq!(loaded.structure.len(), 2);
        assert_eq!(loaded.structure[0].kind(), Some("image"));
        assert_eq!(loaded.metadata.name, "Sample");
    }

    #[tokio::test]
    async fn persist_inserted_block_clamps_index() {
        let storage = MemoryStorage::new();
        let card = sample_card();
        let store = store(storage);
        store.save(&card, None).await.unwrap();

        let result = store
            .persist_inserted_block(&card, BlockEntry::pending("tail"), 99, None)
            .await
            .unwrap();
        assert_eq!(result.next_structure[2].id.as_str(), "tail");
    }
}
