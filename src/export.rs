//! JSON document view of a subtree
//!
//! Each node becomes an object holding its properties, then its child nodes,
//! keyed by name. Longs, doubles and booleans stay JSON scalars; decimals and
//! dates are written as strings, binaries as hex, multi-valued properties as
//! arrays.

use crate::error::RepositoryError;
use crate::item::{ItemHandle, Node};
use crate::session::Session;
use crate::value::{PropertyValue, Value};
use serde_json::{Map, Number, Value as JsonValue};

pub fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Long(n) => JsonValue::from(*n),
        Value::Double(d) => Number::from_f64(*d)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Value::Boolean(b) => JsonValue::Bool(*b),
        other => JsonValue::String(other.get_string()),
    }
}

pub fn property_value_to_json(value: &PropertyValue) -> JsonValue {
    match value {
        PropertyValue::Single(v) => value_to_json(v),
        PropertyValue::Multiple(values) => {
            JsonValue::Array(values.iter().map(value_to_json).collect())
        }
    }
}

/// Document view of `node` and everything beneath it.
pub fn node_to_json(node: &Node) -> Result<JsonValue, RepositoryError> {
    let mut object = Map::new();
    for property in node.properties()? {
        object.insert(property.name(), property_value_to_json(&property.content()?));
    }
    for child in node.nodes()? {
        object.insert(child.name(), node_to_json(&child)?);
    }
    Ok(JsonValue::Object(object))
}

/// Document view of the subtree at `path`.
pub fn export_path(session: &Session, path: &str) -> Result<JsonValue, RepositoryError> {
    node_to_json(&session.get_node(path)?)
}
