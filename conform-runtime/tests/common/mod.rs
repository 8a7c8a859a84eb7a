//! Scripted gateway and tokenizer stubs shared by the runtime tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use conform_core::{Completion, ModelGateway, Result, SamplingOptions, Tokenizer};

pub const TRUE_ID: u32 = 1;
pub const FALSE_ID: u32 = 2;
pub const COMMA_ID: u32 = 3;
pub const BRACKET_ID: u32 = 4;
pub const NOISE_ID: u32 = 9;

/// Gateway that replays a fixed list of completions, recording every call.
pub struct ScriptedGateway {
    responses: Mutex<VecDeque<Completion>>,
    calls: Mutex<Vec<(String, SamplingOptions)>>,
}

impl ScriptedGateway {
    pub fn new(responses: Vec<Completion>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every (prompt, options) pair seen so far, in call order.
    pub fn calls(&self) -> Vec<(String, SamplingOptions)> {
        self.calls.lock().unwrap().clone()
    }
}

impl ModelGateway for ScriptedGateway {
    fn generate(&self, prompt: &str, options: &SamplingOptions) -> Result<Vec<Completion>> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), options.clone()));
        let next = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default();
        Ok(vec![next])
    }
}

/// Tokenizer with a tiny fixed vocabulary covering the tokens the engine
/// cares about ("true", "false", ",", "]").
pub struct StubTokenizer {
    vocab: HashMap<String, u32>,
}

impl StubTokenizer {
    pub fn new() -> Self {
        let mut vocab = HashMap::new();
        vocab.insert("true".to_string(), TRUE_ID);
        vocab.insert("false".to_string(), FALSE_ID);
        vocab.insert(",".to_string(), COMMA_ID);
        vocab.insert("]".to_string(), BRACKET_ID);
        vocab.insert("the".to_string(), NOISE_ID);
        Self { vocab }
    }
}

impl Tokenizer for StubTokenizer {
    fn token_to_id(&self, token: &str) -> Option<u32> {
        self.vocab.get(token).copied()
    }

    fn decode(&self, ids: &[u32]) -> Result<String> {
        let mut out = String::new();
        for &id in ids {
            if let Some((token, _)) = self.vocab.iter().find(|&(_, &v)| v == id) {
                out.push_str(token);
            }
        }
        Ok(out)
    }
}

/// Completion carrying only text (token ids empty).
pub fn text(s: &str) -> Completion {
    Completion {
        text: s.to_string(),
        token_ids: Vec::new(),
    }
}

/// Completion carrying only token ids (text empty).
pub fn tokens(ids: &[u32]) -> Completion {
    Completion {
        text: String::new(),
        token_ids: ids.to_vec(),
    }
}
