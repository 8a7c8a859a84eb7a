//! Schema nodes: the closed set of types a value can be generated against.
//!
//! A schema document is a JSON Schema-like descriptor restricted to
//! `object`, `array`, `string`, `number`, and `boolean`. Unknown types are
//! rejected here, at parse time, so the generation walker can match
//! exhaustively and never hit an unsupported-type case mid-generation.

use serde_json::{json, Value};

use crate::error::{ConformError, Result};

/// One node of the type description being generated against.
///
/// Object fields are kept as an ordered list: declaration order fixes the
/// left-to-right structure the model sees, and later fields are allowed to
/// condition on earlier siblings.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Object { properties: Vec<(String, SchemaNode)> },
    Array { items: Box<SchemaNode> },
    String,
    Number,
    Boolean,
}

impl SchemaNode {
    /// Parse a schema document from JSON text.
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// Parse a schema document from a JSON value.
    pub fn from_value(value: &Value) -> Result<Self> {
        Self::from_node(value, "$")
    }

    fn from_node(value: &Value, path: &str) -> Result<Self> {
        let obj = value.as_object().ok_or_else(|| {
            ConformError::InvalidSchema(format!("schema node at {path} must be a JSON object"))
        })?;

        let ty = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                ConformError::InvalidSchema(format!("schema node at {path} has no `type` string"))
            })?;

        match ty {
            "string" => Ok(SchemaNode::String),
            "number" => Ok(SchemaNode::Number),
            "boolean" => Ok(SchemaNode::Boolean),
            "array" => {
                let items = obj.get("items").ok_or_else(|| {
                    ConformError::InvalidSchema(format!("array at {path} has no `items`"))
                })?;
                let item_node = Self::from_node(items, &format!("{path}[]"))?;
                Ok(SchemaNode::Array {
                    items: Box::new(item_node),
                })
            }
            "object" => {
                let props = obj
                    .get("properties")
                    .and_then(|v| v.as_object())
                    .ok_or_else(|| {
                        ConformError::InvalidSchema(format!(
                            "object at {path} has no `properties` map"
                        ))
                    })?;
                let mut properties = Vec::with_capacity(props.len());
                for (key, child) in props {
                    let child_node = Self::from_node(child, &format!("{path}.{key}"))?;
                    properties.push((key.clone(), child_node));
                }
                Ok(SchemaNode::Object { properties })
            }
            other => Err(ConformError::UnsupportedType {
                path: path.to_string(),
                ty: other.to_string(),
            }),
        }
    }

    /// Render the node back to its JSON-schema form (used when the schema is
    /// embedded into prompts).
    pub fn to_value(&self) -> Value {
        match self {
            SchemaNode::String => json!({"type": "string"}),
            SchemaNode::Number => json!({"type": "number"}),
            SchemaNode::Boolean => json!({"type": "boolean"}),
            SchemaNode::Array { items } => json!({"type": "array", "items": items.to_value()}),
            SchemaNode::Object { properties } => {
                let mut props = serde_json::Map::new();
                for (key, child) in properties {
                    props.insert(key.clone(), child.to_value());
                }
                json!({"type": "object", "properties": props})
            }
        }
    }
}
