// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

const COMMANDS_HELP: &str = "\
Offline Queue:
  status      Show queue and store status
  enqueue     Queue a mutation without contacting the server
  submit      Submit a mutation, queueing it if the server is unreachable
  pending     List queued mutations
  drain       Submit every queued mutation now
  clear       Clear one store partition, or all of them

Read Models & Preferences:
  cache       Show or refresh cached read models
  pref        Get or set a user preference

Realtime & Interception:
  listen      Connect the realtime channel and print events
  install     Pre-cache the application shell and activate it
  fetch       Resolve one request through the interception cache";

const HELP_TEMPLATE: &str = "{about-with-newline}
{usage-heading} {usage}

{before-help}Options:
{options}{after-help}";

#[derive(Parser)]
#[command(name = "ft", version)]
#[command(about = "Offline-first sync core for the fittrack app")]
#[command(help_template = HELP_TEMPLATE)]
#[command(before_help = COMMANDS_HELP)]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "FITTRACK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Auth token used for API calls and the realtime channel
    #[arg(long, global = true, env = "FITTRACK_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show pending counts and per-partition store usage
    Status {
        /// Output format (text, json)
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Queue a mutation for the next drain
    #[command(
        arg_required_else_help = true,
        after_help = "Examples:\n  \
        ft enqueue workout '{\"name\":\"Leg Day\"}'\n  \
        ft enqueue measurement '{\"weight\":80.5}'"
    )]
    Enqueue {
        /// Mutation kind (workout, measurement)
        kind: String,

        /// JSON body submitted verbatim on drain
        payload: String,
    },

    /// Submit a mutation now, queueing it if the server is unreachable
    #[command(arg_required_else_help = true)]
    Submit {
        /// Mutation kind (workout, measurement)
        kind: String,

        /// JSON body
        payload: String,

        /// Output format (text, json)
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List queued mutations, oldest first
    Pending {
        /// Only this kind (workout, measurement)
        kind: Option<String>,

        /// Output format (text, json)
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Submit every queued mutation now
    Drain {
        /// Output format (text, json)
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show or refresh cached read models
    #[command(subcommand)]
    Cache(CacheCommand),

    /// Get or set a user preference
    #[command(subcommand)]
    Pref(PrefCommand),

    /// Clear a store partition (pending, cache, preferences, responses), or everything
    Clear {
        /// Partition to clear; omit to clear all
        partition: Option<String>,
    },

    /// Connect the realtime channel and print events as JSON lines
    #[command(after_help = "Queued mutations are drained every time the channel connects.")]
    Listen {
        /// Exit after this many events
        #[arg(long, short = 'n')]
        count: Option<usize>,
    },

    /// Pre-cache the application shell and activate the current cache generation
    Install,

    /// Resolve one GET request through the interception cache and print the body
    #[command(arg_required_else_help = true)]
    Fetch {
        /// Absolute URL, or a path relative to the configured origin
        url: String,

        /// Treat the request as a top-level document load
        #[arg(long)]
        navigate: bool,

        /// Print the status line and response source before the body
        #[arg(long, short)]
        include: bool,
    },
}

/// Cached read-model commands.
#[derive(Subcommand)]
pub enum CacheCommand {
    /// Print the cached records of a resource (workouts, measurements)
    Show {
        resource: String,

        /// Output format (text, json)
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Fetch a resource from the server, falling back to the cache offline
    Refresh {
        resource: String,

        /// Output format (text, json)
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

/// Preference commands.
#[derive(Subcommand)]
pub enum PrefCommand {
    /// Print a preference value
    Get { key: String },

    /// Store a preference value (JSON; bare words are stored as strings)
    Set { key: String, value: String },
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
