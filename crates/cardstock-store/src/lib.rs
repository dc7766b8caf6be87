//! Persistence orchestration for Cardstock card packages.
//!
//! A card is persisted as a small structured package under its card root:
//!
//! ```text
//! <root>/.pkg/metadata.json      identifier, name, tags, timestamps
//! <root>/.pkg/structure.json     block count, ordering, resource accounting
//! <root>/content/<blockId>.json  one content document per block
//! ```
//!
//! [`CardStore`] composes the path resolver, content codec, and resource
//! scanner over an injected [`CardStorage`] capability (text write,
//! directory ensure, text read). No step is transactional with any other: a
//! failure mid-save propagates the underlying error unchanged and leaves
//! prior writes on disk. Save is best-effort; re-run to retry.
//!
//! Two storage backends ship with the crate: [`MemoryStorage`] for tests
//! and embedding, and [`FsStorage`] over the real filesystem.

pub mod error;
pub mod fs;
pub mod layout;
pub mod memory;
pub mod store;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fs::FsStorage;
pub use layout::{ManifestEntry, MetadataFile, StructureManifest};
pub use memory::MemoryStorage;
pub use store::{insert_block_snapshot, CardStore, PersistedInsert};
pub use traits::CardStorage;
