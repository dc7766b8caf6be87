//! The single traversal both scan modes are built on.

use std::collections::BTreeSet;

use serde_json::{Map, Value};
use tracing::trace;

use crate::rules::ScanRules;

/// Rewrite every qualifying resource string in `config` through `resolver`.
///
/// Returns a structurally identical copy: non-qualifying strings, numbers,
/// booleans, and nulls pass through unchanged; sequences are mapped
/// element-wise (elements carry no field-name context); mappings are rebuilt
/// preserving key order, recursing into each value with its key as the new
/// field-name context. A missing config yields an empty mapping.
pub fn transform_config<F>(config: Option<&Value>, rules: &ScanRules, mut resolver: F) -> Value
where
    F: FnMut(&str) -> String,
{
    match config {
        Some(value) => walk(value, None, rules, &mut |raw| Some(resolver(raw))),
        None => Value::Object(Map::new()),
    }
}

/// Collect the resolved absolute paths of every qualifying resource string.
///
/// Same traversal as [`transform_config`]; each qualifying string is mapped
/// through `to_absolute` and accumulated into a deduplicated set. A missing
/// config yields an empty set. Collecting twice over the same config yields
/// the same set.
pub fn collect_resources<F>(
    config: Option<&Value>,
    rules: &ScanRules,
    mut to_absolute: F,
) -> BTreeSet<String>
where
    F: FnMut(&str) -> String,
{
    let mut found = BTreeSet::new();
    if let Some(value) = config {
        walk(value, None, rules, &mut |raw| {
            found.insert(to_absolute(raw));
            None
        });
    }
    found
}

/// Recursive traversal shared by both modes.
///
/// The visitor sees each qualifying string and may return a replacement;
/// `None` keeps the original. Collect mode always returns `None` and only
/// accumulates, so the rebuilt tree is discarded by the caller.
fn walk(
    value: &Value,
    field: Option<&str>,
    rules: &ScanRules,
    visit: &mut dyn FnMut(&str) -> Option<String>,
) -> Value {
    match value {
        Value::String(raw) => {
            if rules.is_resource_candidate(raw, field) {
                trace!(field = field.unwrap_or(""), value = %raw, "resource reference");
                match visit(raw) {
                    Some(replacement) => Value::String(replacement),
                    None => value.clone(),
                }
            } else {
                value.clone()
            }
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| walk(item, None, rules, visit))
                .collect(),
        ),
        Value::Object(map) => {
            let mut rebuilt = Map::with_capacity(map.len());
            for (key, inner) in map {
                rebuilt.insert(key.clone(), walk(inner, Some(key), rules, visit));
            }
            Value::Object(rebuilt)
        }
        // Numbers, booleans, null.
        other => other.clone(),
    }
}
