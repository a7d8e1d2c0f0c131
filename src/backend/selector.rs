//! Selector evaluation for the reference query backend
//!
//! Accepted form: `{"selector": {"<field>": <value>, ...}}`
//!
//! - Every field must match (AND semantics)
//! - Missing field = no match
//! - Strings compare case-insensitively, everything else exactly
//! - Operator objects (`{"$gt": ..}`) are not supported and rejected
//!
//! Anything else is a syntax error. Parsing happens here and nowhere else;
//! the record store forwards raw selectors untouched.

use serde_json::{Map, Value};

use super::errors::{BackendError, BackendResult};

/// A parsed equality selector.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorFilter {
    fields: Map<String, Value>,
}

impl SelectorFilter {
    /// Parses a selector string.
    pub fn parse(raw: &str) -> BackendResult<Self> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| BackendError::query_syntax(format!("invalid selector JSON: {}", e)))?;

        let mut top = match value {
            Value::Object(map) => map,
            _ => return Err(BackendError::query_syntax("query must be a JSON object")),
        };

        if let Some(extra) = top.keys().find(|k| k.as_str() != "selector") {
            return Err(BackendError::query_syntax(format!(
                "unsupported query field '{}'",
                extra
            )));
        }

        let fields = match top.remove("selector") {
            Some(Value::Object(fields)) => fields,
            Some(_) => return Err(BackendError::query_syntax("selector must be an object")),
            None => return Err(BackendError::query_syntax("query is missing 'selector'")),
        };

        if let Some((name, _)) = fields.iter().find(|(_, v)| v.is_object()) {
            return Err(BackendError::query_syntax(format!(
                "operators are not supported (field '{}')",
                name
            )));
        }

        Ok(Self { fields })
    }

    /// Checks if a document matches all conditions.
    pub fn matches(&self, document: &Value) -> bool {
        self.fields.iter().all(|(field, expected)| {
            document
                .get(field)
                .map(|actual| Self::eq_match(actual, expected))
                .unwrap_or(false)
        })
    }

    fn eq_match(actual: &Value, expected: &Value) -> bool {
        match (actual, expected) {
            (Value::String(a), Value::String(b)) => a.to_lowercase() == b.to_lowercase(),
            _ => actual == expected,
        }
    }
}
