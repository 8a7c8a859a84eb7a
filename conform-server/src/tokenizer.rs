use std::path::Path;

use conform_core::{ConformError, Result, Tokenizer};
use tokenizers::Tokenizer as HfTokenizer;

/// `tokenizers`-backed adapter for the engine's tokenizer seam. Must load
/// the tokenizer.json matching the upstream model, or the "true"/"false"
/// id lookups and the continuation scan will see a different vocabulary
/// than the one the model samples from.
pub struct ConformTokenizer {
    inner: HfTokenizer,
}

impl ConformTokenizer {
    pub fn from_file(path: &Path) -> Result<Self> {
        let inner =
            HfTokenizer::from_file(path).map_err(|e| ConformError::Tokenizer(e.to_string()))?;
        Ok(Self { inner })
    }

    pub fn encode(&self, text: &str) -> Result<Vec<u32>> {
        let encoding = self
            .inner
            .encode(text, false)
            .map_err(|e| ConformError::Tokenizer(e.to_string()))?;
        Ok(encoding.get_ids().to_vec())
    }
}

impl Tokenizer for ConformTokenizer {
    fn token_to_id(&self, token: &str) -> Option<u32> {
        self.inner.token_to_id(token)
    }

    fn decode(&self, ids: &[u32]) -> Result<String> {
        self.inner
            .decode(ids, false)
            .map_err(|e| ConformError::Tokenizer(e.to_string()))
    }
}
