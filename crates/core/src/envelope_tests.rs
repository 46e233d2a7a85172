// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use serde_json::json;

#[test]
fn parses_success_body() {
    let env: ApiEnvelope =
        serde_json::from_value(json!({"success": true, "data": [{"id": "a"}]})).unwrap();
    assert!(env.success);
    assert!(!env.offline);
    assert_eq!(env.records(), vec![json!({"id": "a"})]);
}

#[test]
fn parses_failure_body() {
    let env: ApiEnvelope =
        serde_json::from_value(json!({"success": false, "error": "Validation failed"})).unwrap();
    assert!(!env.success);
    assert_eq!(env.error_message(), "Validation failed");
    assert!(env.records().is_empty());
}

#[test]
fn failure_without_error_text_has_generic_message() {
    let env: ApiEnvelope = serde_json::from_value(json!({"success": false})).unwrap();
    assert_eq!(env.error_message(), "request failed");
}

#[test]
fn offline_list_serializes_compactly() {
    let env = ApiEnvelope::ok(json!([])).offline();
    assert_eq!(
        serde_json::to_value(&env).unwrap(),
        json!({"success": true, "data": [], "offline": true})
    );
}

#[test]
fn failure_omits_data() {
    let env = ApiEnvelope::failure("nope").offline();
    let value = serde_json::to_value(&env).unwrap();
    assert!(value.get("data").is_none());
    assert_eq!(value["error"], "nope");
}
