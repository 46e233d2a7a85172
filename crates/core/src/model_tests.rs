// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use serde_json::json;
use yare::parameterized;

#[parameterized(
    workout = { "workout", MutationKind::Workout },
    workouts_plural = { "workouts", MutationKind::Workout },
    measurement_upper = { "Measurement", MutationKind::Measurement },
)]
fn mutation_kind_parses(input: &str, expected: MutationKind) {
    assert_eq!(input.parse::<MutationKind>().unwrap(), expected);
}

#[test]
fn mutation_kind_rejects_unknown() {
    let err = "sleep".parse::<MutationKind>().unwrap_err();
    assert!(matches!(err, Error::InvalidKind(ref s) if s == "sleep"));
}

#[test]
fn mutation_kind_endpoints() {
    assert_eq!(MutationKind::Workout.endpoint(), "workouts");
    assert_eq!(MutationKind::Measurement.endpoint(), "measurements");
    assert_eq!(MutationKind::Workout.resource(), ResourceClass::Workouts);
}

#[test]
fn resource_class_round_trips_through_display() {
    for resource in ResourceClass::ALL {
        assert_eq!(resource.to_string().parse::<ResourceClass>().unwrap(), resource);
    }
}

#[test]
fn partition_parses_alias() {
    assert_eq!("prefs".parse::<Partition>().unwrap(), Partition::Preferences);
    assert!("everything".parse::<Partition>().is_err());
}

#[test]
fn pending_mutation_serializes_camel_case() {
    let mutation = PendingMutation {
        id: "workout_1_abc".into(),
        kind: MutationKind::Workout,
        payload: json!({"name": "Leg Day"}),
        auth_token: "tok".into(),
        enqueued_at: 1,
    };
    let value = serde_json::to_value(&mutation).unwrap();
    assert_eq!(value["authToken"], "tok");
    assert_eq!(value["enqueuedAt"], 1);
    assert_eq!(value["kind"], "workout");
}

#[parameterized(
    mongo_id = { json!({"_id": "m1", "id": "other"}), Some("m1") },
    plain_id = { json!({"id": "a"}), Some("a") },
    numeric_id = { json!({"id": 7}), Some("7") },
    empty_id = { json!({"_id": "", "id": "b"}), Some("b") },
    missing = { json!({"name": "x"}), None },
    not_object = { json!([1, 2]), None },
)]
fn record_key_extraction(record: serde_json::Value, expected: Option<&str>) {
    assert_eq!(record_key(&record).as_deref(), expected);
}

#[test]
fn pending_mutation_enqueued_at_utc() {
    let mutation = PendingMutation {
        id: "m".into(),
        kind: MutationKind::Measurement,
        payload: json!({}),
        auth_token: String::new(),
        enqueued_at: 1_700_000_000_000,
    };
    let ts = mutation.enqueued_at_utc().unwrap();
    assert_eq!(ts.to_rfc3339(), "2023-11-14T22:13:20+00:00");
}
