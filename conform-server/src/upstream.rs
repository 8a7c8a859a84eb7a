//! Model gateway adapter speaking the OpenAI completions wire format to an
//! upstream inference server.

use std::sync::Arc;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use conform_core::{Completion, ConformError, ModelGateway, Result, SamplingOptions};

use crate::tokenizer::ConformTokenizer;

pub struct UpstreamGateway {
    client: Client,
    completions_url: String,
    model: String,
    /// Used to recover token ids: the completions wire format returns text
    /// only, so completions are re-encoded with the local tokenizer.
    tokenizer: Arc<ConformTokenizer>,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    temperature: f32,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    stop: &'a [String],
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: String,
}

fn build_request<'a>(
    model: &'a str,
    prompt: &'a str,
    options: &'a SamplingOptions,
) -> CompletionRequest<'a> {
    CompletionRequest {
        model,
        prompt,
        max_tokens: options.max_tokens,
        temperature: options.temperature,
        stop: &options.stop,
    }
}

impl UpstreamGateway {
    pub fn new(base_url: &str, model: &str, tokenizer: Arc<ConformTokenizer>) -> Self {
        Self {
            client: Client::new(),
            completions_url: format!("{}/v1/completions", base_url.trim_end_matches('/')),
            model: model.to_string(),
            tokenizer,
        }
    }
}

impl ModelGateway for UpstreamGateway {
    fn generate(&self, prompt: &str, options: &SamplingOptions) -> Result<Vec<Completion>> {
        let body = build_request(&self.model, prompt, options);
        let response = self
            .client
            .post(&self.completions_url)
            .json(&body)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| ConformError::Gateway(e.to_string()))?;

        let parsed: CompletionResponse = response
            .json()
            .map_err(|e| ConformError::Gateway(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .map(|choice| {
                let token_ids = self.tokenizer.encode(&choice.text)?;
                Ok(Completion {
                    text: choice.text,
                    token_ids,
                })
            })
            .collect()
    }
}
