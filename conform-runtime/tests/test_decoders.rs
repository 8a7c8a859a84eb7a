//! Tests for the scalar decoders: number, boolean, and string.

mod common;

use common::{text, tokens, ScriptedGateway, StubTokenizer, FALSE_ID, NOISE_ID, TRUE_ID};
use conform_core::{GenerationOptions, SchemaNode};
use conform_runtime::GenerationSession;
use serde_json::json;

fn run_scalar(schema_text: &str, responses: Vec<conform_core::Completion>) -> serde_json::Value {
    let gateway = ScriptedGateway::new(responses);
    let tokenizer = StubTokenizer::new();
    let schema = SchemaNode::parse(schema_text).unwrap();
    let session = GenerationSession::new(
        &gateway,
        &tokenizer,
        &schema,
        "fill in the value",
        GenerationOptions::default(),
    );
    session.run().unwrap()
}

// ===== Number Decoder =====

#[test]
fn test_number_strips_whitespace_and_trailing_period() {
    let value = run_scalar(r#"{"type": "number"}"#, vec![text(" 3.14. ")]);
    assert_eq!(value, json!(3.14));
}

#[test]
fn test_number_succeeds_on_retry() {
    let gateway = ScriptedGateway::new(vec![text("junk"), text("42")]);
    let tokenizer = StubTokenizer::new();
    let schema = SchemaNode::parse(r#"{"type": "number"}"#).unwrap();
    let session = GenerationSession::new(
        &gateway,
        &tokenizer,
        &schema,
        "count",
        GenerationOptions::default(),
    );
    let value = session.run().unwrap();
    assert_eq!(value, json!(42.0));
    assert_eq!(gateway.calls().len(), 2);
}

#[test]
fn test_number_sentinel_after_exhausted_retries() {
    let gateway = ScriptedGateway::new(vec![
        text("not"),
        text("a"),
        text("number"),
        text("still not"),
    ]);
    let tokenizer = StubTokenizer::new();
    let schema = SchemaNode::parse(r#"{"type": "number"}"#).unwrap();
    let session = GenerationSession::new(
        &gateway,
        &tokenizer,
        &schema,
        "count",
        GenerationOptions::default(),
    );
    let value = session.run().unwrap();
    assert_eq!(value, json!(-1.0));

    // Exactly 4 attempts: the initial call plus 3 retries.
    let calls = gateway.calls();
    assert_eq!(calls.len(), 4);

    // Temperature escalates strictly, x1.3 per step, from the base of 1.0.
    let temps: Vec<f32> = calls.iter().map(|(_, opts)| opts.temperature).collect();
    for pair in temps.windows(2) {
        assert!(pair[1] > pair[0], "temperature must strictly increase");
        assert!((pair[1] - pair[0] * 1.3).abs() < 1e-4);
    }
    assert!((temps[0] - 1.0).abs() < 1e-6);
}

#[test]
fn test_number_uses_bounded_token_budget() {
    let gateway = ScriptedGateway::new(vec![text("7")]);
    let tokenizer = StubTokenizer::new();
    let schema = SchemaNode::parse(r#"{"type": "number"}"#).unwrap();
    let session = GenerationSession::new(
        &gateway,
        &tokenizer,
        &schema,
        "count",
        GenerationOptions::default(),
    );
    session.run().unwrap();
    let calls = gateway.calls();
    assert_eq!(calls[0].1.max_tokens, Some(6));
}

// ===== Boolean Decoder =====

#[test]
fn test_boolean_true_token_earlier_wins() {
    let value = run_scalar(
        r#"{"type": "boolean"}"#,
        vec![tokens(&[NOISE_ID, TRUE_ID, FALSE_ID])],
    );
    assert_eq!(value, json!(true));
}

#[test]
fn test_boolean_false_token_earlier_wins() {
    let value = run_scalar(
        r#"{"type": "boolean"}"#,
        vec![tokens(&[FALSE_ID, NOISE_ID, TRUE_ID])],
    );
    assert_eq!(value, json!(false));
}

#[test]
fn test_boolean_only_true_present() {
    let value = run_scalar(
        r#"{"type": "boolean"}"#,
        vec![tokens(&[NOISE_ID, NOISE_ID, TRUE_ID])],
    );
    assert_eq!(value, json!(true));
}

#[test]
fn test_boolean_neither_token_defaults_to_false() {
    let value = run_scalar(
        r#"{"type": "boolean"}"#,
        vec![tokens(&[NOISE_ID, NOISE_ID, NOISE_ID])],
    );
    assert_eq!(value, json!(false));
}

#[test]
fn test_boolean_call_is_uncapped() {
    let gateway = ScriptedGateway::new(vec![tokens(&[TRUE_ID])]);
    let tokenizer = StubTokenizer::new();
    let schema = SchemaNode::parse(r#"{"type": "boolean"}"#).unwrap();
    let session = GenerationSession::new(
        &gateway,
        &tokenizer,
        &schema,
        "decide",
        GenerationOptions::default(),
    );
    session.run().unwrap();
    assert_eq!(gateway.calls()[0].1.max_tokens, None);
}

// ===== String Decoder =====

#[test]
fn test_string_without_quote_returned_verbatim() {
    let value = run_scalar(r#"{"type": "string"}"#, vec![text("  ran out of budge")]);
    assert_eq!(value, json!("  ran out of budge"));
}

#[test]
fn test_string_cut_at_first_quote_and_trimmed() {
    let value = run_scalar(
        r#"{"type": "string"}"#,
        vec![text(" pizza\", \"next\": 1}")],
    );
    assert_eq!(value, json!("pizza"));
}

#[test]
fn test_string_prompt_primed_with_opening_quote() {
    let gateway = ScriptedGateway::new(vec![text("hi\"")]);
    let tokenizer = StubTokenizer::new();
    let schema = SchemaNode::parse(r#"{"type": "string"}"#).unwrap();
    let session = GenerationSession::new(
        &gateway,
        &tokenizer,
        &schema,
        "greet",
        GenerationOptions::default(),
    );
    session.run().unwrap();
    let calls = gateway.calls();
    assert!(calls[0].0.ends_with('"'));
    assert_eq!(calls[0].1.max_tokens, Some(10));
}
