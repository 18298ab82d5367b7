//! In-place cleanup of embedded state before projection
//!
//! Rules, applied recursively:
//! - object keys named `__typename` are removed
//! - object entries whose value is `null` are removed
//! - `null` array elements are removed
//!
//! `false`, `0` and empty strings are kept; coordinates and flags use them.

use serde_json::Value;

/// GraphQL type tag attached to every object in the embedded state
const TYPENAME_KEY: &str = "__typename";

/// Removes noise fields from `value` in place
pub fn sanitize(value: &mut Value) {
    match value {
        Value::Object(object) => {
            object.retain(|key, field| key != TYPENAME_KEY && !field.is_null());
            object.values_mut().for_each(sanitize);
        }
        Value::Array(items) => {
            items.retain(|item| !item.is_null());
            items.iter_mut().for_each(sanitize);
        }
        _ => {}
    }
}
