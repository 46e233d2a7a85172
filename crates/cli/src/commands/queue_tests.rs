// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::commands::test_helpers::{output, test_context};
use crate::error::Error;
use serde_json::{json, Value};

#[tokio::test]
async fn enqueue_prints_id_and_stores_token() {
    let (ctx, _api) = test_context();
    let mut buf = Vec::new();

    enqueue(&ctx, "workout", r#"{"name":"Leg Day"}"#, &mut buf).await.unwrap();

    let id = output(buf).trim().to_string();
    assert!(id.starts_with("workout_"));
    let pending = ctx.store().list_pending(MutationKind::Workout).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, id);
    assert_eq!(pending[0].auth_token, "tok");
}

#[tokio::test]
async fn enqueue_rejects_bad_input() {
    let (ctx, _api) = test_context();
    let mut buf = Vec::new();

    let err = enqueue(&ctx, "workout", "{not json", &mut buf).await.unwrap_err();
    assert!(matches!(err, Error::InvalidPayload(_)));

    let err = enqueue(&ctx, "yoga", "{}", &mut buf).await.unwrap_err();
    assert!(matches!(err, Error::Store(ft_core::Error::InvalidKind(_))));

    assert!(!ctx.store().has_pending_work().await.unwrap());
}

#[tokio::test]
async fn submit_offline_reports_queued() {
    let (ctx, api) = test_context();
    api.set_offline(true);
    let mut buf = Vec::new();

    submit(&ctx, "measurement", r#"{"weight":80}"#, OutputFormat::Json, &mut buf).await.unwrap();

    let outcome: Value = serde_json::from_str(&output(buf)).unwrap();
    assert_eq!(outcome["outcome"], "queued");
    assert!(outcome["id"].as_str().unwrap().starts_with("measurement_"));
    assert_eq!(ctx.store().pending_count(MutationKind::Measurement).await.unwrap(), 1);
}

#[tokio::test]
async fn submit_online_reports_submitted() {
    let (ctx, api) = test_context();
    let mut buf = Vec::new();

    submit(&ctx, "workout", r#"{"name":"Push"}"#, OutputFormat::Text, &mut buf).await.unwrap();

    assert!(output(buf).starts_with("Submitted workout:"));
    assert_eq!(api.submissions().len(), 1);
}

#[tokio::test]
async fn pending_lists_oldest_first_across_kinds() {
    let (ctx, _api) = test_context();
    let store = ctx.store();
    store.enqueue_mutation(MutationKind::Measurement, &json!({"weight": 80}), "t").await.unwrap();
    store.enqueue_mutation(MutationKind::Workout, &json!({"name": "A"}), "t").await.unwrap();
    store.enqueue_mutation(MutationKind::Workout, &json!({"name": "B"}), "t").await.unwrap();

    let mut buf = Vec::new();
    pending(&ctx, None, OutputFormat::Json, &mut buf).await.unwrap();
    let entries: Vec<PendingMutation> = serde_json::from_str(&output(buf)).unwrap();
    let payloads: Vec<_> = entries.iter().map(|e| e.payload.clone()).collect();
    assert_eq!(payloads, vec![json!({"name": "A"}), json!({"name": "B"}), json!({"weight": 80})]);

    let mut buf = Vec::new();
    pending(&ctx, Some("measurement"), OutputFormat::Text, &mut buf).await.unwrap();
    let text = output(buf);
    assert_eq!(text.lines().count(), 1);
    assert!(text.contains(r#"{"weight":80}"#));
}

#[tokio::test]
async fn pending_empty_queue() {
    let (ctx, _api) = test_context();
    let mut buf = Vec::new();
    pending(&ctx, None, OutputFormat::Text, &mut buf).await.unwrap();
    assert_eq!(output(buf), "No pending mutations\n");
}

#[tokio::test]
async fn drain_reports_counts() {
    let (ctx, api) = test_context();
    ctx.store().enqueue_mutation(MutationKind::Workout, &json!({"name": "ok"}), "t").await.unwrap();
    ctx.store().enqueue_mutation(MutationKind::Workout, &json!({"bad": true}), "t").await.unwrap();
    api.reject(json!({"bad": true}));

    let mut buf = Vec::new();
    drain(&ctx, OutputFormat::Text, &mut buf).await.unwrap();

    assert_eq!(output(buf), "Drained: 1 succeeded, 1 failed\n");
    assert_eq!(ctx.store().pending_count(MutationKind::Workout).await.unwrap(), 1);
}

#[tokio::test]
async fn token_is_required_to_queue() {
    let (ctx, _api) = test_context();
    let ctx = Context::with_store(ctx.config().clone(), None, ctx.store().clone());
    let mut buf = Vec::new();

    let err = enqueue(&ctx, "workout", "{}", &mut buf).await.unwrap_err();
    assert!(matches!(err, Error::MissingToken));
}
