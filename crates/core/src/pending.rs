//! Pending-purchase wire-shape normalization.
//!
//! The `modules` field of a pending-purchase record was written by several
//! generations of checkout code: sometimes a list of module ids, sometimes a
//! map of id -> truthy flag, sometimes a single bare id string. All readers go
//! through [`parse_pending_modules`] so representation is branched on exactly
//! once, at the store boundary; everything downstream works on one canonical
//! deduplicated list.

use serde_json::Value;

/// Normalize a raw `modules` value into a deduplicated, order-preserving list
/// of non-empty module identifiers.
///
/// Accepted shapes:
/// - a bare string: `"phonetic-graphism"`
/// - a list of strings: `["m1", "m2"]` (non-string entries are skipped)
/// - a map of id -> flag: `{"m1": true, "m2": 0}` (only truthy flags kept)
///
/// Anything else yields an empty list, which callers treat as a malformed
/// record to clean up.
pub fn parse_pending_modules(raw: &Value) -> Vec<String> {
    let mut modules = Vec::new();
    match raw {
        Value::String(id) => push_unique(&mut modules, id),
        Value::Array(items) => {
            for item in items {
                if let Value::String(id) = item {
                    push_unique(&mut modules, id);
                }
            }
        }
        Value::Object(map) => {
            for (id, flag) in map {
                if is_truthy(flag) {
                    push_unique(&mut modules, id);
                }
            }
        }
        _ => {}
    }
    modules
}

fn push_unique(modules: &mut Vec<String>, id: &str) {
    let id = id.trim();
    if !id.is_empty() && !modules.iter().any(|m| m == id) {
        modules.push(id.to_string());
    }
}

/// JavaScript-style truthiness for legacy flag values.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
