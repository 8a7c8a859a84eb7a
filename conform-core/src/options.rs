/// Decoding configuration for one generation session.
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    /// Hard cap on elements generated per array.
    pub max_array_length: usize,
    /// Token budget for one number sample.
    pub max_number_tokens: usize,
    /// Token budget for one string sample.
    pub max_string_tokens: usize,
    /// Base sampling temperature.
    pub temperature: f32,
    /// Extra attempts after a failed number parse. Each retry multiplies the
    /// temperature by 1.3; exhausting the budget yields the -1 sentinel.
    pub number_retries: usize,
    /// How many leading token ids the array-termination oracle inspects.
    pub lookahead_window: usize,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_array_length: 10,
            max_number_tokens: 6,
            max_string_tokens: 10,
            temperature: 1.0,
            number_retries: 3,
            lookahead_window: 30,
        }
    }
}
