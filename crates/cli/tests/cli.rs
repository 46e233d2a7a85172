// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Black-box tests for the `ft` binary. The API is unreachable in every
//! test, so these cover the offline paths end to end across processes.

#![allow(clippy::unwrap_used)]

mod common;
use common::*;

use serde_json::Value;

fn stdout_json(output: std::process::Output) -> Value {
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn help_lists_command_groups() {
    ft().arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Offline Queue:"))
        .stdout(predicate::str::contains("listen"));
}

#[test]
fn enqueued_mutations_survive_restart() {
    let env = TestEnv::new();
    let first = env.enqueue("workout", r#"{"name":"Leg Day"}"#);
    let second = env.enqueue("measurement", r#"{"weight":80.5}"#);
    assert!(first.starts_with("workout_"));
    assert!(second.starts_with("measurement_"));

    let pending = stdout_json(env.ft().args(["pending", "--format", "json"]).output().unwrap());

    let ids: Vec<&str> = pending.as_array().unwrap().iter().map(|e| e["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec![first.as_str(), second.as_str()]);
    assert_eq!(pending[0]["authToken"], "tok");
    assert_eq!(pending[0]["payload"]["name"], "Leg Day");
}

#[test]
fn submit_while_unreachable_queues() {
    let env = TestEnv::new();

    env.ft()
        .args(["submit", "workout", r#"{"name":"Push"}"#])
        .assert()
        .success()
        .stdout(predicate::str::contains("Server unreachable, queued workout as workout_"));

    let status = stdout_json(env.ft().args(["status", "-f", "json"]).output().unwrap());
    assert_eq!(status["pending"]["workout"], 1);
}

#[test]
fn drain_while_unreachable_keeps_entries() {
    let env = TestEnv::new();
    env.enqueue("workout", "{}");

    env.ft().arg("drain").assert().success().stdout("Drained: 0 succeeded, 1 failed\n");

    env.ft()
        .args(["pending", "workout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("workout_"));
}

#[test]
fn preferences_round_trip_between_runs() {
    let env = TestEnv::new();

    env.ft().args(["pref", "set", "units", "metric"]).assert().success();
    env.ft().args(["pref", "get", "units"]).assert().success().stdout("\"metric\"\n");
    env.ft().args(["pref", "get", "theme"]).assert().success().stdout("theme is not set\n");
}

#[test]
fn clear_partition_only_touches_that_partition() {
    let env = TestEnv::new();
    env.enqueue("workout", "{}");
    env.ft().args(["pref", "set", "units", "metric"]).assert().success();

    env.ft().args(["clear", "pending"]).assert().success().stdout("Cleared 1 entries from pending\n");

    env.ft().arg("pending").assert().success().stdout("No pending mutations\n");
    env.ft().args(["pref", "get", "units"]).assert().success().stdout("\"metric\"\n");
}

#[test]
fn cache_refresh_offline_serves_empty_cache() {
    let env = TestEnv::new();

    env.ft()
        .args(["cache", "refresh", "workouts"])
        .assert()
        .success()
        .stdout("Offline: 0 cached workouts\n");
}

#[test]
fn missing_token_is_reported() {
    let env = TestEnv::new();

    env.ft()
        .env_remove("FITTRACK_TOKEN")
        .args(["enqueue", "workout", "{}"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: no auth token"))
        .stderr(predicate::str::contains("FITTRACK_TOKEN"));
}

#[test]
fn invalid_kind_and_payload_are_rejected() {
    let env = TestEnv::new();

    env.ft()
        .args(["enqueue", "yoga", "{}"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid mutation kind: 'yoga'"));
    env.ft()
        .args(["enqueue", "workout", "{oops"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid JSON payload"));
    env.ft().arg("pending").assert().success().stdout("No pending mutations\n");
}

#[test]
fn bad_config_is_reported() {
    let env = TestEnv::new();
    std::fs::write(env.config_path(), "[channel]\nurl = \"http://nope\"\n").unwrap();

    env.ft()
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config error: channel.url"));
}

#[test]
fn listen_fails_when_channel_is_unreachable() {
    let env = TestEnv::new();
    let config = std::fs::read_to_string(env.config_path()).unwrap();
    std::fs::write(env.config_path(), format!("{config}\n[channel]\nurl = \"ws://127.0.0.1:9\"\n")).unwrap();

    env.ft().arg("listen").assert().failure().stderr(predicate::str::contains("error:"));
}
