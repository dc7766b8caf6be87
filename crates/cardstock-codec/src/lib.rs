//! Content document codec for Cardstock.
//!
//! Every block of a card is persisted as one *content document*: a file with
//! exactly two top-level fields, `type` (non-empty string) and `data` (a
//! mapping). Any other top-level shape — extra fields, a bare array, the
//! legacy flat layout that stored block fields at the document root — is
//! invalid and rejected outright rather than repaired, so schema drift can
//! never pass silently.
//!
//! Parse failure is an expected outcome, not an exception: [`parse`] returns
//! `None` and callers branch on it.

pub mod content;
pub mod error;

pub use content::{create, parse, stringify, ContentDocument};
pub use error::{CodecError, Result};
