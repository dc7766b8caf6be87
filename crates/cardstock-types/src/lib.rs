//! Foundation types for Cardstock card documents.
//!
//! A *card* is a single editable document composed of an ordered sequence of
//! content *blocks*. This crate provides the in-memory model shared by every
//! other Cardstock crate: identifiers, block entries with their
//! hydrated/pending content states, and the [`CardDocument`] itself.
//!
//! # Key Types
//!
//! - [`CardId`] / [`BlockId`] — Opaque string identifiers
//! - [`BlockContent`] — Hydrated config vs. pending (content file not yet read)
//! - [`BlockEntry`] — One block: id plus content state
//! - [`CardDocument`] — Metadata plus the ordered block structure

pub mod block;
pub mod card;
pub mod id;

pub use block::{BlockContent, BlockEntry};
pub use card::{CardDocument, CardMetadata};
pub use id::{BlockId, CardId};
