//! Request/response types for the generation endpoint.

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// The natural-language instruction to generate against.
    pub query: String,
    /// Target schema. Falls back to the built-in agent schema when absent.
    #[serde(default)]
    pub schema: Option<serde_json::Value>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_array_length: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    /// The schema-shaped value.
    pub value: serde_json::Value,
    /// True when the direct completion was not valid JSON and the engine
    /// had to drive generation field by field.
    pub constrained: bool,
}

/// The default target: an agent turn with free-form thoughts and a single
/// command to execute.
pub fn default_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "thoughts": {
                "type": "object",
                "properties": {
                    "text": {"type": "string"},
                    "reasoning": {"type": "string"},
                    "plan": {"type": "string"},
                    "criticism": {"type": "string"},
                    "speak": {"type": "string"}
                }
            },
            "command": {
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "args": {
                        "type": "object",
                        "properties": {
                            "arg_name": {"type": "string"}
                        }
                    }
                }
            }
        }
    })
}
