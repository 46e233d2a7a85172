// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use super::*;
use clap::CommandFactory;
use yare::parameterized;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("ft").chain(args.iter().copied())).unwrap()
}

#[test]
fn definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn global_flags_work_after_subcommand() {
    let cli = parse(&["drain", "--token", "tok", "-vv", "--config", "/tmp/c.toml"]);
    assert_eq!(cli.token.as_deref(), Some("tok"));
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
    assert!(matches!(cli.command, Command::Drain { format: OutputFormat::Text }));
}

#[test]
fn enqueue_takes_kind_and_payload() {
    let cli = parse(&["enqueue", "workout", r#"{"name":"Leg Day"}"#]);
    let Command::Enqueue { kind, payload } = cli.command else {
        panic!("expected enqueue");
    };
    assert_eq!(kind, "workout");
    assert_eq!(payload, r#"{"name":"Leg Day"}"#);
}

#[test]
fn cache_and_pref_subcommands_parse() {
    let cli = parse(&["cache", "show", "workouts", "-f", "json"]);
    assert!(matches!(
        cli.command,
        Command::Cache(CacheCommand::Show { ref resource, format: OutputFormat::Json }) if resource == "workouts"
    ));

    let cli = parse(&["pref", "set", "units", "metric"]);
    assert!(matches!(
        cli.command,
        Command::Pref(PrefCommand::Set { ref key, ref value }) if key == "units" && value == "metric"
    ));
}

#[test]
fn fetch_flags_parse() {
    let cli = parse(&["fetch", "/dashboard", "--navigate", "-i"]);
    assert!(matches!(cli.command, Command::Fetch { navigate: true, include: true, .. }));
}

#[parameterized(
    enqueue_without_payload = { &["enqueue", "workout"] },
    submit_without_args = { &["submit"] },
    unknown_command = { &["sync"] },
    bad_format = { &["status", "--format", "yaml"] },
)]
fn invalid_invocations_are_rejected(args: &[&str]) {
    let argv = std::iter::once("ft").chain(args.iter().copied());
    assert!(Cli::try_parse_from(argv).is_err());
}
