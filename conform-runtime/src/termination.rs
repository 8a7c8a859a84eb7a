//! Array-termination oracle: decides whether an array should grow.
//!
//! Array length is not known a priori, so the model's own continuation
//! preference is consulted after each element: a comma among the leading
//! candidate tokens means "more elements", a closing bracket (or neither)
//! means "stop". The oracle sits behind a trait so other strategies (e.g.
//! grammar-constrained logit masking) can be substituted without touching
//! the array decoder's control flow.

use tracing::debug;

use conform_core::{ModelGateway, Result, SamplingOptions, Tokenizer};

/// Decides whether another array element should be generated.
pub trait ArrayTermination {
    /// `prompt` is the prompt built from the array's state before the most
    /// recent element was appended. Returns true to continue the array.
    fn should_continue(
        &self,
        gateway: &dyn ModelGateway,
        tokenizer: &dyn Tokenizer,
        prompt: &str,
    ) -> Result<bool>;
}

/// The token-scan heuristic: issue one uncapped gateway call and inspect a
/// fixed-size prefix of the returned token ids, decoding each id on its own.
/// The first id whose decoded text contains a comma signals continuation;
/// one containing a closing bracket signals completion. Tokenizer-dependent
/// by nature (multi-character tokens may embed either character), which is
/// why it lives behind the trait.
pub struct TokenScanTermination {
    window: usize,
}

impl TokenScanTermination {
    pub fn new(window: usize) -> Self {
        Self { window }
    }
}

impl ArrayTermination for TokenScanTermination {
    fn should_continue(
        &self,
        gateway: &dyn ModelGateway,
        tokenizer: &dyn Tokenizer,
        prompt: &str,
    ) -> Result<bool> {
        let completions = gateway.generate(prompt, &SamplingOptions::default())?;
        let Some(completion) = completions.first() else {
            return Ok(false);
        };

        let mut found_comma = false;
        let mut found_close_bracket = false;

        for &token_id in completion.token_ids.iter().take(self.window) {
            let decoded = tokenizer.decode(&[token_id])?;
            if decoded.contains(',') {
                found_comma = true;
                break;
            }
            if decoded.contains(']') {
                found_close_bracket = true;
                break;
            }
        }

        debug!(found_comma, found_close_bracket, "array continuation scan");
        Ok(found_comma && !found_close_bracket)
    }
}
