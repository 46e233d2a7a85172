// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::commands::test_helpers::{output, test_context};
use serde_json::json;
use yare::parameterized;

#[parameterized(
    bare_word = { "metric", json!("metric") },
    number = { "42", json!(42) },
    object = { r#"{"rest":90}"#, json!({"rest": 90}) },
    boolean = { "true", json!(true) },
)]
#[test_macro(tokio::test)]
async fn set_parses_json_or_stores_string(raw: &str, expected: Value) {
    let (ctx, _api) = test_context();

    set(&ctx, "k", raw, &mut Vec::new()).await.unwrap();

    assert_eq!(ctx.store().get_preference("k").await.unwrap(), Some(expected));
}

#[tokio::test]
async fn get_prints_value_or_unset() {
    let (ctx, _api) = test_context();

    let mut buf = Vec::new();
    get(&ctx, "units", &mut buf).await.unwrap();
    assert_eq!(output(buf), "units is not set\n");

    set(&ctx, "units", "imperial", &mut Vec::new()).await.unwrap();
    let mut buf = Vec::new();
    get(&ctx, "units", &mut buf).await.unwrap();
    assert_eq!(output(buf), "\"imperial\"\n");
}
