//! Generation session: walks the schema and drives the model, one slot at a
//! time, until the partial value is complete.
//!
//! Generation is strictly sequential within a session: every model call
//! conditions on the serialized value produced by all previous calls.
//! Independent sessions may run concurrently; each owns its partial value
//! outright and only borrows the gateway and tokenizer.

use tracing::debug;

use conform_core::{
    Completion, ConformError, GenerationOptions, ModelGateway, PartialValue, Result,
    SamplingOptions, SchemaNode, Step, Tokenizer,
};

use crate::prompt::render_prompt;
use crate::termination::{ArrayTermination, TokenScanTermination};

/// Returned in place of a number once the retry budget is exhausted. A
/// deliberate best-effort degradation: a malformed number should not abort
/// an entire multi-field object. Callers needing strict validity should
/// treat it as a soft-failure signal.
pub const NUMBER_FAILURE_SENTINEL: f64 = -1.0;

/// One schema-guided generation run. Created per request, discarded after
/// the final value is returned or generation fails fatally.
pub struct GenerationSession<'a> {
    gateway: &'a dyn ModelGateway,
    tokenizer: &'a dyn Tokenizer,
    schema: &'a SchemaNode,
    instruction: &'a str,
    options: GenerationOptions,
    termination: Box<dyn ArrayTermination + 'a>,
    /// Serialized schema document, embedded into every prompt.
    schema_json: String,
    root: PartialValue,
}

impl<'a> GenerationSession<'a> {
    pub fn new(
        gateway: &'a dyn ModelGateway,
        tokenizer: &'a dyn Tokenizer,
        schema: &'a SchemaNode,
        instruction: &'a str,
        options: GenerationOptions,
    ) -> Self {
        let termination = Box::new(TokenScanTermination::new(options.lookahead_window));
        let schema_json = schema.to_value().to_string();
        Self {
            gateway,
            tokenizer,
            schema,
            instruction,
            options,
            termination,
            schema_json,
            root: PartialValue::Pending,
        }
    }

    /// Substitute the array-termination oracle.
    pub fn with_termination(mut self, termination: Box<dyn ArrayTermination + 'a>) -> Self {
        self.termination = termination;
        self
    }

    /// Walk the full schema tree and return the completed value.
    pub fn run(mut self) -> Result<serde_json::Value> {
        let schema = self.schema;
        let mut path = Vec::new();
        self.generate_node(schema, &mut path)?;
        self.root.into_json()
    }

    /// Generate a value for one schema node into the slot at `path`. The
    /// slot must already hold the `Pending` marker: for scalars that marker
    /// is what truncates the prompt; for containers it is replaced by an
    /// empty container before recursing.
    fn generate_node(&mut self, schema: &'a SchemaNode, path: &mut Vec<Step>) -> Result<()> {
        match schema {
            SchemaNode::Number => {
                let prompt = self.prompt()?;
                let n = self.decode_number(&prompt)?;
                self.fill(path, PartialValue::Number(n))
            }
            SchemaNode::Boolean => {
                let prompt = self.prompt()?;
                let b = self.decode_boolean(&prompt)?;
                self.fill(path, PartialValue::Bool(b))
            }
            SchemaNode::String => {
                let prompt = self.prompt()?;
                let s = self.decode_string(&prompt)?;
                self.fill(path, PartialValue::String(s))
            }
            SchemaNode::Object { properties } => {
                self.fill(path, PartialValue::Object(Vec::with_capacity(properties.len())))?;
                self.generate_object(properties, path)
            }
            SchemaNode::Array { items } => {
                self.fill(path, PartialValue::Array(Vec::new()))?;
                self.generate_array(items, path)
            }
        }
    }

    /// Generate every declared field, in schema order. Any fatal field
    /// failure aborts the whole object; there is no best-effort mode.
    fn generate_object(
        &mut self,
        properties: &'a [(String, SchemaNode)],
        path: &mut Vec<Step>,
    ) -> Result<()> {
        for (i, (key, child)) in properties.iter().enumerate() {
            debug!(field = %key, "generating object field");
            match self.root.slot_mut(path)? {
                PartialValue::Object(fields) => {
                    fields.push((key.clone(), PartialValue::Pending));
                }
                _ => {
                    return Err(ConformError::Internal(
                        "object slot lost during field generation".into(),
                    ))
                }
            }
            path.push(Step::Field(i));
            self.generate_node(child, path)?;
            path.pop();
        }
        Ok(())
    }

    /// Populate an array element by element, up to the configured maximum,
    /// stopping early when the termination oracle says the array is done.
    fn generate_array(&mut self, items: &'a SchemaNode, path: &mut Vec<Step>) -> Result<()> {
        for i in 0..self.options.max_array_length {
            match self.root.slot_mut(path)? {
                PartialValue::Array(elements) => elements.push(PartialValue::Pending),
                _ => {
                    return Err(ConformError::Internal(
                        "array slot lost during element generation".into(),
                    ))
                }
            }
            // Snapshot before the element resolves: the fragment shows the
            // array so far with a comma expected next. The continuation
            // check below runs against this prompt, not the grown array.
            let continuation_prompt = self.prompt()?;

            path.push(Step::Item(i));
            self.generate_node(items, path)?;
            path.pop();

            if !self
                .termination
                .should_continue(self.gateway, self.tokenizer, &continuation_prompt)?
            {
                break;
            }
        }
        Ok(())
    }

    fn prompt(&self) -> Result<String> {
        render_prompt(self.instruction, &self.schema_json, &self.root)
    }

    fn fill(&mut self, path: &[Step], value: PartialValue) -> Result<()> {
        *self.root.slot_mut(path)? = value;
        Ok(())
    }

    fn first_completion(&self, prompt: &str, options: &SamplingOptions) -> Result<Completion> {
        let mut completions = self.gateway.generate(prompt, options)?;
        if completions.is_empty() {
            return Err(ConformError::Gateway("model returned no completions".into()));
        }
        Ok(completions.remove(0))
    }

    /// Sample a bounded number of tokens and parse them as a float. Parse
    /// failures retry with escalating temperature (x1.3 per attempt) up to
    /// the retry budget, then degrade to the sentinel.
    fn decode_number(&self, prompt: &str) -> Result<f64> {
        debug!(prompt, "decode number");
        let mut temperature = self.options.temperature;
        for attempt in 0..=self.options.number_retries {
            let options = SamplingOptions {
                max_tokens: Some(self.options.max_number_tokens),
                temperature,
                stop: Vec::new(),
            };
            let completion = self.first_completion(prompt, &options)?;
            let cleaned = completion.text.trim().trim_end_matches('.');
            match cleaned.parse::<f64>() {
                Ok(n) if n.is_finite() => {
                    debug!(value = n, "decoded number");
                    return Ok(n);
                }
                _ => {
                    debug!(attempt, text = %completion.text, "number parse failed");
                    temperature *= 1.3;
                }
            }
        }
        Ok(NUMBER_FAILURE_SENTINEL)
    }

    /// Decide a boolean from the relative rank of the "true" and "false"
    /// token ids in a single uncapped completion. Only the first
    /// distinguishing token matters, so no token cap is imposed beyond the
    /// model's default. Neither token appearing defaults to false.
    fn decode_boolean(&self, prompt: &str) -> Result<bool> {
        debug!(prompt, "decode boolean");
        let options = SamplingOptions {
            max_tokens: None,
            temperature: self.options.temperature,
            stop: Vec::new(),
        };
        let completion = self.first_completion(prompt, &options)?;

        let position = |token: &str| {
            self.tokenizer
                .token_to_id(token)
                .and_then(|id| completion.token_ids.iter().position(|&t| t == id))
        };

        let result = match (position("true"), position("false")) {
            (Some(true_pos), Some(false_pos)) => true_pos < false_pos,
            (Some(_), None) => true,
            _ => false,
        };
        debug!(result, "decoded boolean");
        Ok(result)
    }

    /// Sample string content after priming the prompt with an opening quote,
    /// and cut at the first quote the model emits. A completion with no
    /// quote at all is returned verbatim: the budget ran out before the
    /// string closed.
    fn decode_string(&self, prompt: &str) -> Result<String> {
        let primed = format!("{prompt}\"");
        debug!(prompt = %primed, "decode string");
        let options = SamplingOptions {
            max_tokens: Some(self.options.max_string_tokens),
            temperature: self.options.temperature,
            stop: Vec::new(),
        };
        let completion = self.first_completion(&primed, &options)?;
        let text = completion.text;
        match text.find('"') {
            None => Ok(text),
            Some(i) => Ok(text[..i].trim().to_string()),
        }
    }
}
