//! Structured (JSON) histories. Requires the `serde` feature.
#![cfg(feature = "serde")]

use histcheck_core::executor::objects::Register;
use histcheck_core::history::types::Schema;
use histcheck_core::{CheckerConfig, ConsistencyChecker};
use serde::Deserialize;
use serde_json::{json, Value};

/// An argument type with no `Default`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct Token(i64);

fn stale_read() -> Value {
    json!({
        "class": "Register",
        "sequences": [
            {
                "index": 1,
                "invocations": [
                    { "method": { "name": "write", "void": true }, "arguments": [1] }
                ]
            },
            {
                "index": 2,
                "invocations": [
                    { "method": { "name": "read" }, "arguments": [], "result": 1 },
                    { "method": { "name": "read" }, "arguments": [], "result": null }
                ]
            }
        ]
    })
}

#[test]
fn structured_history_is_checked() {
    let h: Schema<Value> = serde_json::from_value(stale_read()).unwrap();
    assert_eq!(h.invocation_count(), 3);
    assert!(h.sequences[1].invocations[1].result.is_none());
    assert!(h.order.is_empty());

    let strict = ConsistencyChecker::new(CheckerConfig::default(), Register);
    assert_eq!(strict.check(&h), Ok(false));

    let weak = ConsistencyChecker::new(
        CheckerConfig {
            weak: true,
            ..CheckerConfig::default()
        },
        Register,
    );
    assert_eq!(weak.check(&h), Ok(true));
}

#[test]
fn value_type_needs_no_default() {
    let h: Schema<Token> = serde_json::from_value(stale_read()).unwrap();
    assert_eq!(h.sequences[0].invocations[0].arguments, vec![Token(1)]);
    assert_eq!(h.sequences[1].invocations[0].result, Some(Token(1)));
    assert!(h.parameters.is_empty());
}

#[test]
fn unknown_fields_are_rejected() {
    let mut history = stale_read();
    history["sequences"][0]["invocations"][0]["timestamp"] = json!(12);
    assert!(serde_json::from_value::<Schema<Value>>(history).is_err());
}

#[test]
fn missing_fields_are_rejected() {
    let mut history = stale_read();
    history["sequences"][0]
        .as_object_mut()
        .unwrap()
        .remove("index");
    assert!(serde_json::from_value::<Schema<Value>>(history).is_err());
}

#[test]
fn config_defaults_missing_flags() {
    let config: CheckerConfig = serde_json::from_value(json!({ "weak": true })).unwrap();
    assert_eq!(
        config,
        CheckerConfig {
            weak: true,
            jit: false,
            min: false
        }
    );
}
