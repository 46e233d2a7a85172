// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use crate::config::Config;
use crate::sync::test_helpers::MockApi;
use crate::sync::OfflineStore;

use super::Context;

/// Context over an in-memory store and a [`MockApi`], with token `tok`.
pub fn test_context() -> (Context, Arc<MockApi>) {
    let api = MockApi::new();
    let ctx = Context::with_store(Config::default(), Some("tok".into()), Arc::new(OfflineStore::in_memory()))
        .with_api(api.clone());
    (ctx, api)
}

/// Output captured from one command.
pub fn output(buf: Vec<u8>) -> String {
    String::from_utf8(buf).unwrap()
}
