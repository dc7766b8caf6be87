//! Resource handle resolution for Cardstock.
//!
//! Preview and rendering code needs runtime-consumable handles for the
//! binary resources a card references (images, audio, video, fonts). This
//! crate turns an absolute resource path into such a handle: fetch raw bytes
//! through an injected [`ByteSource`], wrap them in a typed blob (MIME
//! inferred from the extension), and obtain a short-lived revocable handle
//! from an injected [`HandleFactory`].
//!
//! # Handle lifecycle
//!
//! Handles are caller-owned. Every [`MediaResolver::resolve`] is an
//! independent resolution — the same path resolved twice yields two
//! distinct handles — and each must be paired with exactly one
//! [`MediaResolver::release`]. Nothing tracks outstanding handles globally;
//! leak avoidance is the caller's discipline. Release is best-effort: a
//! failed revoke is logged and swallowed, never propagated.

pub mod error;
pub mod memory;
pub mod mime;
pub mod resolver;
pub mod traits;

pub use error::{MediaError, Result};
pub use memory::{MemoryByteSource, MemoryHandleFactory};
pub use mime::mime_for_path;
pub use resolver::{build_full_path, MediaResolver, ResolvedResource, ResourceOrigin};
pub use traits::{ByteSource, HandleFactory};
