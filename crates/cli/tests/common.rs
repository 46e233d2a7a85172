// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use std::fs;
use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// An `ft` environment isolated in a temp directory.
///
/// The config points the store into the directory and the API at a closed
/// local port, so every server call fails as "unreachable".
pub struct TestEnv {
    pub dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_api("http://127.0.0.1:9/api/v1")
    }

    pub fn with_api(base_url: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let config = format!(
            "[api]\nbase_url = \"{}\"\nrequest_timeout_secs = 2\n\n[store]\npath = '{}'\n",
            base_url,
            dir.path().join("offline.db").display()
        );
        fs::write(dir.path().join("config.toml"), config).unwrap();
        TestEnv { dir }
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    /// `ft` with this environment's config and token `tok`.
    pub fn ft(&self) -> Command {
        let mut cmd = ft();
        cmd.env("FITTRACK_CONFIG", self.config_path()).env("FITTRACK_TOKEN", "tok");
        cmd
    }

    /// Queue a mutation and return its id.
    pub fn enqueue(&self, kind: &str, payload: &str) -> String {
        let output = self.ft().args(["enqueue", kind, payload]).output().unwrap();
        assert!(output.status.success(), "enqueue failed: {}", String::from_utf8_lossy(&output.stderr));
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }
}

pub fn ft() -> Command {
    let mut cmd = cargo_bin_cmd!("ft");
    cmd.env_remove("FITTRACK_CONFIG").env_remove("FITTRACK_TOKEN").env_remove("RUST_LOG");
    cmd
}
