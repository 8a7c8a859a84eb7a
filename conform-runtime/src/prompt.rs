//! Prompt rendering from partial generation state.
//!
//! Every model call sees the same three-part prompt: the caller's
//! instruction, the target schema, and the JSON serialization of the value
//! built so far — cut off exactly at the slot being generated. The dangling
//! fragment is the mechanism by which the model is told "continue from
//! here".

use conform_core::{PartialValue, Result};

/// Render the full prompt for the current generation step.
///
/// `schema_json` is the serialized schema document; `value` must contain the
/// `Pending` marker (a marker-less value fails with `MarkerMissing`).
pub fn render_prompt(instruction: &str, schema_json: &str, value: &PartialValue) -> Result<String> {
    let progress = value.prompt_fragment()?;
    Ok(format!(
        "{instruction}\nFormat the answer using the following JSON schema:\n{schema_json}\nResult: {progress}"
    ))
}
