//! Schema-unaware resource scanning over block configurations.
//!
//! Block configurations are arbitrary nested JSON values whose strings may
//! reference binary resources (images, audio, video, fonts) by relative
//! path. This crate walks a configuration without knowing its schema and
//! either rewrites qualifying strings in place ([`transform_config`]) or
//! collects their resolved absolute paths ([`collect_resources`]).
//!
//! Both modes share one traversal parameterized by a leaf visitor, so the
//! qualification rules can never drift between them. What qualifies is
//! driven by [`ScanRules`]: a case-insensitive field-name allowlist, a file
//! extension allowlist for strings under other field names, a list of
//! direct-access scheme prefixes (network/blob/data URIs that need no
//! resolution), and the internal `card-res://` prefix marking strings that
//! were already resolved.

pub mod rules;
pub mod walk;

pub use rules::{ScanRules, RESOLVED_PREFIX};
pub use walk::{collect_resources, transform_config};
