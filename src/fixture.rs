//! Fixture documents: item trees declared in TOML or JSON
//!
//! ```toml
//! [[node]]
//! path = "/content"
//! type = "nt:folder"
//!
//! [node.properties]
//! title = "Home"
//! tags = ["a", "b"]
//! price = { type = "decimal", value = "9.99" }
//!
//! [[node.node]]
//! path = "/content/en"
//! ```
//!
//! Plain scalars map to string, long, double and boolean values; arrays map
//! to multi-valued properties; `{ type, value }` or `{ type, values }` tables
//! parse their text with the named value type (binary values are hex).

use crate::builder::{node, property, repository, NodeBuilder, RepositoryBuilder};
use crate::error::ApiError;
use crate::value::{PropertyValue, Value, ValueType};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// A whole fixture file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FixtureDocument {
    #[serde(default, rename = "node")]
    pub nodes: Vec<FixtureNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureNode {
    pub path: String,

    #[serde(default, rename = "type")]
    pub node_type: Option<String>,

    #[serde(default)]
    pub properties: IndexMap<String, FixtureValue>,

    #[serde(default, rename = "node")]
    pub nodes: Vec<FixtureNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FixtureValue {
    Scalar(FixtureScalar),
    List(Vec<FixtureScalar>),
    Typed {
        #[serde(rename = "type")]
        value_type: String,
        #[serde(default)]
        value: Option<String>,
        #[serde(default)]
        values: Option<Vec<String>>,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FixtureScalar {
    Boolean(bool),
    Long(i64),
    Double(f64),
    String(String),
}

impl FixtureScalar {
    fn to_value(&self) -> Value {
        match self {
            FixtureScalar::Boolean(b) => Value::Boolean(*b),
            FixtureScalar::Long(n) => Value::Long(*n),
            FixtureScalar::Double(d) => Value::Double(*d),
            FixtureScalar::String(s) => Value::String(s.clone()),
        }
    }
}

impl FixtureValue {
    pub fn to_property_value(&self) -> Result<PropertyValue, ApiError> {
        match self {
            FixtureValue::Scalar(scalar) => Ok(PropertyValue::Single(scalar.to_value())),
            FixtureValue::List(list) => Ok(PropertyValue::Multiple(
                list.iter().map(FixtureScalar::to_value).collect(),
            )),
            FixtureValue::Typed {
                value_type,
                value,
                values,
            } => {
                let value_type: ValueType = value_type.parse()?;
                match (value, values) {
                    (Some(text), None) => Ok(PropertyValue::Single(Value::parse(value_type, text)?)),
                    (None, Some(texts)) => Ok(PropertyValue::Multiple(
                        texts
                            .iter()
                            .map(|text| Value::parse(value_type, text))
                            .collect::<Result<Vec<_>, _>>()?,
                    )),
                    _ => Err(ApiError::FixtureError(format!(
                        "typed {} value needs exactly one of 'value' or 'values'",
                        value_type
                    ))),
                }
            }
        }
    }
}

impl FixtureNode {
    pub fn to_builder(&self) -> Result<NodeBuilder, ApiError> {
        let mut builder = node(&self.path);
        if let Some(node_type) = &self.node_type {
            builder = builder.of_type(node_type);
        }
        for (name, value) in &self.properties {
            let value = value.to_property_value().map_err(|e| {
                ApiError::FixtureError(format!("{}/{}: {}", self.path, name, e))
            })?;
            builder = builder.with(property(name, value));
        }
        for child in &self.nodes {
            builder = builder.child(child.to_builder()?);
        }
        Ok(builder)
    }
}

impl FixtureDocument {
    pub fn from_toml_str(text: &str) -> Result<Self, ApiError> {
        toml::from_str(text).map_err(|e| ApiError::FixtureError(format!("Invalid TOML fixture: {}", e)))
    }

    pub fn from_json_str(text: &str) -> Result<Self, ApiError> {
        serde_json::from_str(text)
            .map_err(|e| ApiError::FixtureError(format!("Invalid JSON fixture: {}", e)))
    }

    /// Load a fixture file; the format follows the `.toml` or `.json` extension.
    pub fn load(path: &Path) -> Result<Self, ApiError> {
        let text = std::fs::read_to_string(path)?;
        let document = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&text)?,
            Some("json") => Self::from_json_str(&text)?,
            _ => {
                return Err(ApiError::FixtureError(format!(
                    "Unsupported fixture format: {} (expected .toml or .json)",
                    path.display()
                )))
            }
        };
        debug!(path = %path.display(), nodes = document.nodes.len(), "Fixture loaded");
        Ok(document)
    }

    pub fn to_builder(&self) -> Result<RepositoryBuilder, ApiError> {
        let nodes = self
            .nodes
            .iter()
            .map(FixtureNode::to_builder)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(repository().nodes(nodes))
    }
}
