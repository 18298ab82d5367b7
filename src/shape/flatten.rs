//! Single-element array collapsing
//!
//! Rendered pages wrap lone values in one-element arrays. Collapsing them
//! gives downstream consumers a denser shape.

use serde_json::Value;

/// Replaces every single-element array with its (flattened) element
///
/// Arrays of zero or two-plus elements stay arrays; their elements are
/// flattened in turn. The operation is idempotent.
pub fn flatten(value: Value) -> Value {
    match value {
        Value::Array(mut items) if items.len() == 1 => items.pop().map_or(Value::Null, flatten),
        Value::Array(items) => Value::Array(items.into_iter().map(flatten).collect()),
        Value::Object(object) => Value::Object(
            object
                .into_iter()
                .map(|(key, field)| (key, flatten(field)))
                .collect(),
        ),
        scalar => scalar,
    }
}
