//! Resolution of card identifiers and path inputs to absolute card roots.

use tracing::debug;

use crate::error::{PathError, Result};
use crate::roots::WorkspaceRoots;

/// Package file suffix stripped from a card id when deriving its directory.
pub const PACKAGE_SUFFIX: &str = ".pkg";

/// Convert backslashes to forward slashes and trim trailing slashes.
///
/// A bare root (`"/"`) is preserved rather than reduced to the empty string.
pub fn normalize_path(path: &str) -> String {
    let forward = path.replace('\\', "/");
    let trimmed = forward.trim_end_matches('/');
    if trimmed.is_empty() && forward.starts_with('/') {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Returns `true` for unix-absolute (`/...`) or drive-letter (`C:...`) paths.
pub fn is_absolute_path(path: &str) -> bool {
    if path.starts_with('/') {
        return true;
    }
    let mut chars = path.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(c), Some(':')) if c.is_ascii_alphabetic()
    )
}

/// Resolve a card's root directory.
///
/// Resolution order:
/// 1. An absolute `explicit` path wins, normalized.
/// 2. An `explicit` path whose first component is a configured root's leaf
///    name (its alias) resolves against that root.
/// 3. Any other `explicit` path is taken relative to the workspace root.
/// 4. Without `explicit`, the id (package suffix stripped) is joined to the
///    workspace root.
/// 5. Without a workspace root either, the bare id is returned unchanged;
///    callers must treat that result as non-authoritative.
pub fn resolve_card_root(card_id: &str, explicit: Option<&str>, roots: &WorkspaceRoots) -> String {
    if let Some(raw) = explicit {
        let path = normalize_path(raw);
        if is_absolute_path(&path) {
            return path;
        }
        if let Some(resolved) = resolve_alias(&path, roots) {
            debug!(path = %path, resolved = %resolved, "alias path resolved");
            return resolved;
        }
        if let Some(ws) = &roots.workspace_root {
            return format!("{ws}/{path}");
        }
        return path;
    }

    if let Some(ws) = &roots.workspace_root {
        let stem = card_id.strip_suffix(PACKAGE_SUFFIX).unwrap_or(card_id);
        return format!("{ws}/{stem}");
    }

    // No explicit path and no workspace root: nothing to anchor against.
    card_id.to_string()
}

/// Resolve a card's root directory, requiring at least one identity input.
///
/// `context` names the calling operation and appears verbatim in the error.
pub fn require_card_root(
    card_id: Option<&str>,
    explicit: Option<&str>,
    roots: &WorkspaceRoots,
    context: &str,
) -> Result<String> {
    if card_id.is_none() && explicit.is_none() {
        return Err(PathError::MissingIdentity {
            context: context.to_string(),
        });
    }
    Ok(resolve_card_root(card_id.unwrap_or(""), explicit, roots))
}

/// Try both configured roots' aliases against the leading path component.
fn resolve_alias(path: &str, roots: &WorkspaceRoots) -> Option<String> {
    let candidates = [
        (roots.workspace_root.as_deref(), roots.workspace_alias()),
        (roots.external_root.as_deref(), roots.external_alias()),
    ];
    for (root, alias) in candidates {
        let (root, alias) = match (root, alias) {
            (Some(r), Some(a)) if !a.is_empty() => (r, a),
            _ => continue,
        };
        if path == alias {
            return Some(root.to_string());
        }
        if let Some(rest) = path.strip_prefix(alias).and_then(|r| r.strip_prefix('/')) {
            return Some(format!("{root}/{rest}"));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roots() -> WorkspaceRoots {
        WorkspaceRoots::new("/root/TestWorkspace").with_external("/mnt/ExternalLib")
    }

    #[test]
    fn absolute_path_passes_through() {
        assert_eq!(
            resolve_card_root("card-001", Some("/abs/x"), &roots()),
            "/abs/x"
        );
    }

    #[test]
    fn drive_letter_path_is_absolute() {
        assert_eq!(
            resolve_card_root("card-001", Some("D:\\cards\\c1\\"), &roots()),
            "D:/cards/c1"
        );
    }

    #[test]
    fn workspace_alias_expands_to_root() {
        assert_eq!(
            resolve_card_root("card-001", Some("TestWorkspace/card-001"), &roots()),
            "/root/TestWorkspace/card-001"
        );
    }

    #[test]
    fn external_alias_expands_to_external_root() {
        assert_eq!(
            resolve_card_root("card-001", Some("ExternalLib/fonts/f.ttf"), &roots()),
            "/mnt/ExternalLib/fonts/f.ttf"
        );
    }

    #[test]
    fn bare_alias_resolves_to_root_itself() {
        assert_eq!(
            resolve_card_root("card-001", Some("TestWorkspace"), &roots()),
            "/root/TestWorkspace"
        );
    }

    #[test]
    fn plain_relative_joins_workspace_root() {
        assert_eq!(
            resolve_card_root("card-001", Some("cards/card-001"), &roots()),
            "/root/TestWorkspace/cards/card-001"
        );
    }

    #[test]
    fn backslash_alias_path_is_normalized() {
        assert_eq!(
            resolve_card_root("card-001", Some("TestWorkspace\\cards\\card-001"), &roots()),
            "/root/TestWorkspace/cards/card-001"
        );
    }

    #[test]
    fn missing_path_strips_package_suffix_from_id() {
        assert_eq!(
            resolve_card_root("card-001.pkg", None, &roots()),
            "/root/TestWorkspace/card-001"
        );
    }

    #[test]
    fn id_without_suffix_is_joined_as_is() {
        assert_eq!(
            resolve_card_root("card-001", None, &roots()),
            "/root/TestWorkspace/card-001"
        );
    }

    #[test]
    fn no_roots_returns_bare_id() {
        assert_eq!(
            resolve_card_root("card-001", None, &WorkspaceRoots::empty()),
            "card-001"
        );
    }

    #[test]
    fn explicit_relative_without_roots_stays_relative() {
        assert_eq!(
            resolve_card_root("card-001", Some("cards\\c1"), &WorkspaceRoots::empty()),
            "cards/c1"
        );
    }

    #[test]
    fn require_fails_without_any_identity() {
        let err = require_card_root(None, None, &roots(), "save").unwrap_err();
        assert_eq!(
            err,
            PathError::MissingIdentity {
                context: "save".into()
            }
        );
        assert!(err
            .to_string()
            .starts_with("card path precondition violated"));
        assert!(err.to_string().contains("save"));
    }

    #[test]
    fn require_succeeds_with_either_input() {
        assert_eq!(
            require_card_root(Some("card-001.pkg"), None, &roots(), "save").unwrap(),
            "/root/TestWorkspace/card-001"
        );
        assert_eq!(
            require_card_root(None, Some("/abs/x"), &roots(), "save").unwrap(),
            "/abs/x"
        );
    }

    #[test]
    fn normalize_preserves_bare_root() {
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("a/b///"), "a/b");
    }
}
