//! Partial values: the in-progress output being built across model calls.
//!
//! A `PartialValue` mirrors the schema structurally, except that exactly one
//! leaf position may hold `Pending` — the typed generation marker denoting
//! "the field the model is currently filling". The prompt builder serializes
//! the tree up to that slot and stops, producing the intentionally
//! incomplete JSON fragment the model is asked to continue.

use serde_json::Value;

use crate::error::{ConformError, Result};

/// One navigation step into a partial value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Index into an object's ordered field list.
    Field(usize),
    /// Index into an array's elements.
    Item(usize),
}

/// The in-progress structured value owned by a generation session.
#[derive(Debug, Clone, PartialEq)]
pub enum PartialValue {
    /// The generation marker: the slot currently being filled.
    Pending,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<PartialValue>),
    Object(Vec<(String, PartialValue)>),
}

impl PartialValue {
    /// Serialize the value as JSON text, truncated exactly at the `Pending`
    /// slot. A request with no `Pending` present is an invariant violation:
    /// the marker must always be in place when a prompt is built.
    pub fn prompt_fragment(&self) -> Result<String> {
        let mut out = String::new();
        if self.write_prefix(&mut out) {
            Ok(out)
        } else {
            Err(ConformError::MarkerMissing)
        }
    }

    /// Write JSON text into `out`, stopping at the first `Pending` slot.
    /// Returns true if a `Pending` slot was reached.
    fn write_prefix(&self, out: &mut String) -> bool {
        match self {
            PartialValue::Pending => true,
            PartialValue::Bool(b) => {
                out.push_str(if *b { "true" } else { "false" });
                false
            }
            PartialValue::Number(n) => {
                out.push_str(&Value::from(*n).to_string());
                false
            }
            PartialValue::String(s) => {
                out.push_str(&Value::String(s.clone()).to_string());
                false
            }
            PartialValue::Array(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    if item.write_prefix(out) {
                        return true;
                    }
                }
                out.push(']');
                false
            }
            PartialValue::Object(fields) => {
                out.push('{');
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    out.push_str(&Value::String(key.clone()).to_string());
                    out.push(':');
                    if value.write_prefix(out) {
                        return true;
                    }
                }
                out.push('}');
                false
            }
        }
    }

    /// Navigate to the slot at `path`. The path must match the value's
    /// current shape; a mismatch indicates a walker bug.
    pub fn slot_mut(&mut self, path: &[Step]) -> Result<&mut PartialValue> {
        let mut cur = self;
        for step in path {
            cur = match (*step, cur) {
                (Step::Field(i), PartialValue::Object(fields)) => fields
                    .get_mut(i)
                    .map(|(_, v)| v)
                    .ok_or_else(|| ConformError::Internal(format!("no field at index {i}")))?,
                (Step::Item(i), PartialValue::Array(items)) => items
                    .get_mut(i)
                    .ok_or_else(|| ConformError::Internal(format!("no element at index {i}")))?,
                _ => {
                    return Err(ConformError::Internal(
                        "path does not match value shape".into(),
                    ))
                }
            };
        }
        Ok(cur)
    }

    /// Convert a completed value into plain JSON, preserving object field
    /// order. A remaining `Pending` slot indicates the walker returned early.
    pub fn into_json(self) -> Result<Value> {
        match self {
            PartialValue::Pending => Err(ConformError::Internal(
                "pending slot left in completed value".into(),
            )),
            PartialValue::Bool(b) => Ok(Value::Bool(b)),
            PartialValue::Number(n) => serde_json::Number::from_f64(n)
                .map(Value::Number)
                .ok_or_else(|| ConformError::Internal("non-finite number in value".into())),
            PartialValue::String(s) => Ok(Value::String(s)),
            PartialValue::Array(items) => {
                let values: Result<Vec<Value>> =
                    items.into_iter().map(PartialValue::into_json).collect();
                Ok(Value::Array(values?))
            }
            PartialValue::Object(fields) => {
                let mut map = serde_json::Map::new();
                for (key, value) in fields {
                    map.insert(key, value.into_json()?);
                }
                Ok(Value::Object(map))
            }
        }
    }
}
