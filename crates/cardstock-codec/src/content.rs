use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{CodecError, Result};

/// The on-disk unit for one block: `{type, data}` and nothing else.
///
/// `deny_unknown_fields` rejects the legacy flat layout (block fields at the
/// document root) as well as any future schema drift; the typed `data` field
/// rejects top-level arrays and scalars.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentDocument {
    /// Canonical block type tag. Non-empty.
    #[serde(rename = "type")]
    pub kind: String,
    /// Block configuration payload. Always a mapping at the top level.
    pub data: Map<String, Value>,
}

/// Deserialize a content document, returning `None` on any failure.
///
/// `None` covers malformed text, a top-level non-mapping, missing or extra
/// fields, a non-string or whitespace-only `type`, and a non-mapping `data`.
/// None of these are exceptional: callers branch on the result.
pub fn parse(text: &str) -> Option<ContentDocument> {
    let doc: ContentDocument = match serde_json::from_str(text) {
        Ok(doc) => doc,
        Err(err) => {
            debug!(error = %err, "content document rejected");
            return None;
        }
    };
    if doc.kind.trim().is_empty() {
        debug!("content document rejected: blank type tag");
        return None;
    }
    Some(doc)
}

/// Construct a content document from a type tag and optional data mapping.
///
/// The type tag is trimmed; an empty trimmed tag is a programmer error and
/// fails with [`CodecError::EmptyKind`]. A missing `data` defaults to an
/// empty mapping.
pub fn create(kind: &str, data: Option<Map<String, Value>>) -> Result<ContentDocument> {
    let kind = kind.trim();
    if kind.is_empty() {
        return Err(CodecError::EmptyKind);
    }
    Ok(ContentDocument {
        kind: kind.to_string(),
        data: data.unwrap_or_default(),
    })
}

/// Serialize a content document in the canonical `{type, data}` shape.
///
/// The legacy flat layout is never emitted. Output is pretty-printed and
/// round-trips losslessly through [`parse`].
pub fn stringify(doc: &ContentDocument) -> Result<String> {
    Ok(serde_json::to_string_pretty(doc)?)
}
