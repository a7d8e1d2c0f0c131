//! Selector construction
//!
//! Exact-match selectors are built as JSON values, so attribute values are
//! escaped rather than spliced into a query string. Values are lower-cased:
//! attribute matching is case-insensitive by policy.
//!
//! Raw selectors are a trust boundary. They are lower-cased and forwarded
//! as-is; validating them is the query backend's job.

use serde_json::{Map, Value};

use crate::record::Attribute;

/// Builds `{"selector":{"<attribute>":"<lower-cased value>"}}`.
pub fn equality_selector(attribute: Attribute, value: &str) -> String {
    let mut fields = Map::new();
    fields.insert(
        attribute.field_name().to_string(),
        Value::String(value.to_lowercase()),
    );

    let mut query = Map::new();
    query.insert("selector".to_string(), Value::Object(fields));
    Value::Object(query).to_string()
}

/// Normalizes a caller-supplied selector before it is forwarded.
pub fn raw_selector(selector: &str) -> String {
    selector.to_lowercase()
}
