//! Card path resolution for Cardstock.
//!
//! Every card lives in a directory (its *card root*) somewhere under one of
//! two configured roots: the workspace root or the external root. This crate
//! turns a card identifier plus an optional explicit or alias path into an
//! absolute card root, with deterministic separator normalization.
//!
//! # Path forms accepted
//!
//! - Absolute paths (`/home/u/ws/card-001`, `C:/ws/card-001`) pass through.
//! - Alias paths (`TestWorkspace/card-001`) — a path whose first component
//!   is the leaf name of a configured root resolves against that root.
//! - Plain relative paths resolve against the workspace root.
//! - A bare card id resolves to `<workspace_root>/<id>` with the `.pkg`
//!   package suffix stripped.
//!
//! All produced paths use forward slashes regardless of input separators.
//!
//! # Modules
//!
//! - [`roots`] — The [`WorkspaceRoots`] configuration value
//! - [`resolve`] — Resolution entry points and normalization helpers
//! - [`error`] — [`PathError`]

pub mod error;
pub mod resolve;
pub mod roots;

pub use error::{PathError, Result};
pub use resolve::{
    is_absolute_path, normalize_path, require_card_root, resolve_card_root, PACKAGE_SUFFIX,
};
pub use roots::WorkspaceRoots;
