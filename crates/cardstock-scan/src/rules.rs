use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Application-internal prefix marking a string as already resolved.
///
/// The preview layer rewrites resource references to `card-res://` handles;
/// the scanner must never pick those up again.
pub const RESOLVED_PREFIX: &str = "card-res://";

/// Field names that are resource-bearing regardless of value shape.
const DEFAULT_FIELDS: &[&str] = &[
    "image_file",
    "audio_file",
    "video_file",
    "font_file",
    "file_path",
    "background_image",
    "cover",
    "src",
    "source",
];

/// Extensions consulted when the field name is not in the allowlist.
#[rustfmt::skip]
const DEFAULT_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "bmp", "svg",  // images
    "mp3", "wav", "ogg", "m4a", "flac",                 // audio
    "mp4", "webm", "mov",                               // video
    "ttf", "otf", "woff", "woff2",                      // fonts
];

/// Scheme prefixes the scanner treats as direct-access references.
const DEFAULT_DIRECT_SCHEMES: &[&str] = &["http://", "https://", "blob:", "data:", "file://"];

/// What the scanner recognizes as a resource reference.
///
/// The defaults cover the editor's standard media fields and extensions;
/// hosts with custom block types extend them through the builder methods.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRules {
    /// Lowercased field names that always carry resources.
    pub fields: HashSet<String>,
    /// Lowercased extensions (without dot) for strings under other fields.
    pub extensions: HashSet<String>,
    /// Prefixes of references that are consumable as-is.
    pub direct_schemes: Vec<String>,
    /// Prefix of references already rewritten to runtime handles.
    pub resolved_prefix: String,
}

impl Default for ScanRules {
    fn default() -> Self {
        Self {
            fields: DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            direct_schemes: DEFAULT_DIRECT_SCHEMES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            resolved_prefix: RESOLVED_PREFIX.to_string(),
        }
    }
}

impl ScanRules {
    /// Add a resource-bearing field name (matched case-insensitively).
    pub fn with_field(mut self, field: &str) -> Self {
        self.fields.insert(field.to_ascii_lowercase());
        self
    }

    /// Add a resource file extension (without the leading dot).
    pub fn with_extension(mut self, ext: &str) -> Self {
        self.extensions
            .insert(ext.trim_start_matches('.').to_ascii_lowercase());
        self
    }

    /// Returns `true` if the string is a direct-access reference.
    pub fn is_direct(&self, value: &str) -> bool {
        self.direct_schemes
            .iter()
            .any(|scheme| value.starts_with(scheme.as_str()))
    }

    /// Decide whether a string value references a resource.
    ///
    /// A candidate must be non-empty, not direct-access, and not already
    /// resolved. It then qualifies if its field name is in the allowlist,
    /// or failing that, if its extension (query string and fragment
    /// stripped) is.
    pub fn is_resource_candidate(&self, value: &str, field: Option<&str>) -> bool {
        if value.is_empty() || self.is_direct(value) || value.starts_with(&self.resolved_prefix) {
            return false;
        }
        if let Some(field) = field {
            if self.fields.contains(&field.to_ascii_lowercase()) {
                return true;
            }
        }
        match extension_of(value) {
            Some(ext) => self.extensions.contains(&ext),
            None => false,
        }
    }
}

/// Lowercased extension of a path-like string, or `None`.
///
/// Query strings and fragments are stripped before the last dot is taken;
/// the candidate extension must not span a path separator.
fn extension_of(value: &str) -> Option<String> {
    let end = value.find(['?', '#']).unwrap_or(value.len());
    let path = &value[..end];
    let (stem, ext) = path.rsplit_once('.')?;
    if ext.is_empty() || stem.is_empty() || ext.contains('/') || ext.contains('\\') {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
