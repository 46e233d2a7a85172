// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    invalid_kind = { Error::InvalidKind("run".into()), "run" },
    invalid_resource = { Error::InvalidResource("stats".into()), "stats" },
    invalid_partition = { Error::InvalidPartition("blobs".into()), "blobs" },
    missing_id = { Error::MissingRecordId { resource: "workouts".into(), position: 2 }, "position 2" },
)]
fn error_display_contains(err: Error, expected: &str) {
    assert!(err.to_string().contains(expected));
}

#[test]
fn error_from_io_is_storage_failure() {
    let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
    let err: Error = io_err.into();
    assert!(matches!(err, Error::Io(_)));
    assert!(err.is_storage_failure());
}

#[test]
fn error_from_sqlite_is_storage_failure() {
    let err: Error = rusqlite::Error::InvalidQuery.into();
    assert!(err.is_storage_failure());
}

#[test]
fn error_from_json_is_not_storage_failure() {
    let json_err = serde_json::from_str::<()>("invalid").unwrap_err();
    let err: Error = json_err.into();
    assert!(matches!(err, Error::Json(_)));
    assert!(!err.is_storage_failure());
}
