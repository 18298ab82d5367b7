//! JSON shaping module
//!
//! The three steps that turn loosely-typed embedded state into a stable
//! document:
//! - sanitizing (drop noise fields in place)
//! - projecting through an allow-list [`Schema`]
//! - flattening single-element arrays

mod flatten;
mod sanitize;
mod schema;

pub use flatten::flatten;
pub use sanitize::sanitize;
pub use schema::{project, Schema};
pub(crate) use schema::schema;

use serde_json::Value;

/// Projects then flattens, the order every pipeline uses
pub fn project_flat(value: &Value, schema: &Schema) -> Value {
    flatten(project(value, schema))
}
