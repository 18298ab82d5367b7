//! Allow-list schemas and projection
//!
//! A schema is a tree: a leaf keeps the value it lands on as-is, a field
//! list keeps only the named keys and descends into each of them.

use serde_json::{Map, Value};

/// Declarative allow-list over a JSON tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schema {
    /// Keep the value unchanged
    Leaf,
    /// Keep only these keys, projecting each through its own schema
    ///
    /// Order is significant: projected objects list keys in this order.
    Fields(Vec<(String, Schema)>),
}

impl Schema {
    /// Builds a field-list schema
    pub fn fields<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Schema)>,
    {
        Self::Fields(
            fields
                .into_iter()
                .map(|(key, schema)| (key.into(), schema))
                .collect(),
        )
    }

    /// Looks up the sub-schema for a key
    pub fn field(&self, key: &str) -> Option<&Schema> {
        match self {
            Self::Leaf => None,
            Self::Fields(fields) => fields
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, schema)| schema),
        }
    }
}

/// Writes a [`Schema`] as a literal tree
///
/// `true` is a leaf, `{ "key": <schema>, ... }` is a field list.
macro_rules! schema {
    (true) => {
        $crate::shape::Schema::Leaf
    };
    ({ $($key:literal : $value:tt),* $(,)? }) => {
        $crate::shape::Schema::Fields(vec![
            $(($key.to_string(), $crate::shape::schema!($value))),*
        ])
    };
}
pub(crate) use schema;

/// Projects `value` through `schema`
///
/// - A leaf schema returns the value unchanged.
/// - A field-list schema on an object keeps only keys present in both,
///   each projected recursively. Absent keys are omitted, never null.
/// - A field-list schema on an array is applied to each element.
/// - A field-list schema on a scalar returns the scalar unchanged.
pub fn project(value: &Value, schema: &Schema) -> Value {
    let fields = match schema {
        Schema::Leaf => return value.clone(),
        Schema::Fields(fields) => fields,
    };

    match value {
        Value::Object(object) => {
            let mut projected = Map::new();
            for (key, sub_schema) in fields {
                if let Some(field) = object.get(key) {
                    projected.insert(key.clone(), project(field, sub_schema));
                }
            }
            Value::Object(projected)
        }
        Value::Array(items) => Value::Array(items.iter().map(|item| project(item, schema)).collect()),
        scalar => scalar.clone(),
    }
}
