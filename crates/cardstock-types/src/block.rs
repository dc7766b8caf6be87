use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::id::BlockId;

/// Content state of a block entry.
///
/// Blocks loaded from a structure manifest start out [`Pending`]: the entry
/// is known (id and position) but its type and configuration still live in
/// the block's content file. Hydration replaces `Pending` with `Hydrated` by
/// reading that file. The two-variant enum makes the hydration step
/// exhaustive instead of hiding it behind a sentinel type string.
///
/// [`Pending`]: BlockContent::Pending
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BlockContent {
    /// Type tag and configuration are in memory.
    Hydrated {
        /// Canonical block type tag (`text`, `image`, `audio`, ...).
        kind: String,
        /// Arbitrary nested configuration. Strings inside may reference
        /// binary resources by relative path; see `cardstock-scan`.
        config: Value,
    },
    /// Content has not been read from the block's content file yet.
    Pending,
}

/// One block of a card: a unique id plus its content state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockEntry {
    pub id: BlockId,
    pub content: BlockContent,
}

impl BlockEntry {
    /// A fully hydrated entry.
    pub fn hydrated(id: impl Into<BlockId>, kind: impl Into<String>, config: Value) -> Self {
        Self {
            id: id.into(),
            content: BlockContent::Hydrated {
                kind: kind.into(),
                config,
            },
        }
    }

    /// An entry whose content is still on disk.
    pub fn pending(id: impl Into<BlockId>) -> Self {
        Self {
            id: id.into(),
            content: BlockContent::Pending,
        }
    }

    /// The block's type tag, if hydrated.
    pub fn kind(&self) -> Option<&str> {
        match &self.content {
            BlockContent::Hydrated { kind, .. } => Some(kind),
            BlockContent::Pending => None,
        }
    }

    /// The block's configuration, if hydrated.
    pub fn config(&self) -> Option<&Value> {
        match &self.content {
            BlockContent::Hydrated { config, .. } => Some(config),
            BlockContent::Pending => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.content, BlockContent::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hydrated_entry_exposes_kind_and_config() {
        let entry = BlockEntry::hydrated("b1", "image", json!({ "image_file": "cover.png" }));
        assert_eq!(entry.kind(), Some("image"));
        assert_eq!(entry.config(), Some(&json!({ "image_file": "cover.png" })));
        assert!(!entry.is_pending());
    }

    #[test]
    fn pending_entry_has_no_kind() {
        let entry = BlockEntry::pending("b2");
        assert_eq!(entry.kind(), None);
        assert_eq!(entry.config(), None);
        assert!(entry.is_pending());
    }
}
