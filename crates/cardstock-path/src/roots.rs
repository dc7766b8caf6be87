use serde::{Deserialize, Serialize};

use crate::resolve::normalize_path;

/// The two root directories all relative and alias paths resolve against.
///
/// Constructed once at editor startup and passed by reference into every
/// resolution call. Either root may be absent (a fresh install with no
/// external library configured); resolution degrades gracefully in that
/// case.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceRoots {
    /// Root of the user's card workspace, normalized, no trailing slash.
    pub workspace_root: Option<String>,
    /// Root of the external resource library, if configured.
    pub external_root: Option<String>,
}

impl WorkspaceRoots {
    /// Roots with only a workspace directory configured.
    pub fn new(workspace_root: impl Into<String>) -> Self {
        Self {
            workspace_root: Some(normalize_path(&workspace_root.into())),
            external_root: None,
        }
    }

    /// Add an external library root.
    pub fn with_external(mut self, external_root: impl Into<String>) -> Self {
        self.external_root = Some(normalize_path(&external_root.into()));
        self
    }

    /// No roots configured at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Leaf directory name of the workspace root, used as its path alias.
    pub fn workspace_alias(&self) -> Option<&str> {
        self.workspace_root.as_deref().map(leaf_name)
    }

    /// Leaf directory name of the external root, used as its path alias.
    pub fn external_alias(&self) -> Option<&str> {
        self.external_root.as_deref().map(leaf_name)
    }
}

/// Last path component of a normalized path.
fn leaf_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roots_are_normalized_on_construction() {
        let roots = WorkspaceRoots::new("C:\\Users\\u\\TestWorkspace\\");
        assert_eq!(
            roots.workspace_root.as_deref(),
            Some("C:/Users/u/TestWorkspace")
        );
    }

    #[test]
    fn aliases_are_leaf_names() {
        let roots =
            WorkspaceRoots::new("/root/TestWorkspace").with_external("/mnt/media/ExternalLib");
        assert_eq!(roots.workspace_alias(), Some("TestWorkspace"));
        assert_eq!(roots.external_alias(), Some("ExternalLib"));
    }

    #[test]
    fn empty_roots_have_no_aliases() {
        let roots = WorkspaceRoots::empty();
        assert_eq!(roots.workspace_alias(), None);
        assert_eq!(roots.external_alias(), None);
    }
}
