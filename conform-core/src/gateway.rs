//! Trait seams for the external model and tokenizer capabilities.
//!
//! The engine drives a generative model but does not implement one: it only
//! needs "give me completions for this prompt" and "map token ids to text".
//! Adapters (HTTP upstream, in-process stubs for tests) implement these.

use crate::error::Result;

/// Per-call sampling tunables. Built transiently by each decoder call.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingOptions {
    /// Cap on sampled tokens. `None` defers to the model's own default.
    pub max_tokens: Option<usize>,
    pub temperature: f32,
    pub stop: Vec<String>,
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self {
            max_tokens: None,
            temperature: 1.0,
            stop: Vec::new(),
        }
    }
}

/// One candidate completion returned by the model gateway.
#[derive(Debug, Clone, Default)]
pub struct Completion {
    /// Decoded completion text.
    pub text: String,
    /// The generated token ids, in emission order.
    pub token_ids: Vec<u32>,
}

/// The external generative capability the engine drives.
///
/// Must tolerate concurrent invocation from independent sessions; the engine
/// itself calls it strictly sequentially within one session.
pub trait ModelGateway: Send + Sync {
    fn generate(&self, prompt: &str, options: &SamplingOptions) -> Result<Vec<Completion>>;
}

/// Token id <-> text mapping, used to resolve the "true"/"false" ids and to
/// decode candidate ids during array-termination lookahead.
pub trait Tokenizer: Send + Sync {
    /// Resolve a token string to its id, if the vocabulary contains it.
    fn token_to_id(&self, token: &str) -> Option<u32>;

    /// Decode a sequence of token ids to text.
    fn decode(&self, ids: &[u32]) -> Result<String>;
}
