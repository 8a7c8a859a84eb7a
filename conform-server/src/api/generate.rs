//! The generation endpoint.
//!
//! Mirrors the two-pass flow of the original deployment: ask the upstream
//! model once and trust its output if it already parses as JSON; otherwise
//! fall back to schema-guided generation, which cannot produce invalid
//! output.

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, info};

use conform_core::{ConformError, GenerationOptions, ModelGateway, SamplingOptions, SchemaNode};
use conform_runtime::GenerationSession;

use crate::tokenizer::ConformTokenizer;
use crate::upstream::UpstreamGateway;

use super::types::{default_schema, GenerateRequest, GenerateResponse};

/// Shared application state passed to handlers.
pub struct AppState {
    pub gateway: Arc<UpstreamGateway>,
    pub tokenizer: Arc<ConformTokenizer>,
    /// Token budget for the direct (unconstrained) first attempt.
    pub max_tokens: usize,
    /// Default sampling temperature for constrained generation.
    pub temperature: f32,
}

/// POST /v1/generate
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> Response {
    let result = tokio::task::spawn_blocking(move || run_request(&state, req)).await;

    match result {
        Ok(Ok(response)) => Json(response).into_response(),
        Ok(Err(e)) => {
            error!("generation failed: {e}");
            let kind = match e {
                ConformError::UnsupportedType { .. }
                | ConformError::InvalidSchema(_)
                | ConformError::Json(_) => "invalid_request_error",
                _ => "server_error",
            };
            Json(serde_json::json!({
                "error": { "message": e.to_string(), "type": kind }
            }))
            .into_response()
        }
        Err(e) => {
            error!("generation task panicked: {e}");
            Json(serde_json::json!({
                "error": { "message": "generation task failed", "type": "server_error" }
            }))
            .into_response()
        }
    }
}

/// Blocking body of one request: direct attempt first, engine fallback.
fn run_request(state: &AppState, req: GenerateRequest) -> conform_core::Result<GenerateResponse> {
    let schema_value = req.schema.unwrap_or_else(default_schema);
    let schema = SchemaNode::from_value(&schema_value)?;

    // Direct pass: greedy, bounded, unconstrained. Most aligned models get
    // this right most of the time.
    let direct = state.gateway.generate(
        &req.query,
        &SamplingOptions {
            max_tokens: Some(state.max_tokens),
            temperature: 0.0,
            stop: Vec::new(),
        },
    )?;
    if let Some(completion) = direct.first() {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(completion.text.trim()) {
            return Ok(GenerateResponse {
                value,
                constrained: false,
            });
        }
    }

    info!("direct completion was not valid JSON, running constrained generation");

    let mut options = GenerationOptions {
        temperature: state.temperature,
        ..GenerationOptions::default()
    };
    if let Some(t) = req.temperature {
        options.temperature = t;
    }
    if let Some(n) = req.max_array_length {
        options.max_array_length = n;
    }

    let session = GenerationSession::new(
        &*state.gateway,
        &*state.tokenizer,
        &schema,
        &req.query,
        options,
    );
    let value = session.run()?;
    Ok(GenerateResponse {
        value,
        constrained: true,
    })
}

/// GET /conform/v1/health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok"
    }))
}
