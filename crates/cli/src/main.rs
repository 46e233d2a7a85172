// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use std::fs;
use std::path::Path;

use clap::Parser;
use ftrs::Cli;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.log_file.as_deref());
    if let Err(e) = ftrs::run(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins; otherwise `-v` picks the level.
fn setup_logging(verbose: u8, log_file: Option<&Path>) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Try to open log file, fall back to stderr
    let file = log_file.and_then(|path| fs::OpenOptions::new().create(true).append(true).open(path).ok());
    if let Some(file) = file {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(file)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
