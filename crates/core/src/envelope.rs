// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The `{success, data}` / `{success:false, error}` API response envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response body returned by every API endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set on bodies synthesized while offline.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub offline: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiEnvelope {
    pub fn ok(data: Value) -> Self {
        ApiEnvelope { success: true, data, error: None, offline: false, message: None }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        ApiEnvelope {
            success: false,
            data: Value::Null,
            error: Some(error.into()),
            offline: false,
            message: None,
        }
    }

    /// Marks the envelope as synthesized while offline.
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Error text for a failed envelope, or a generic one if the server sent none.
    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or("request failed")
    }

    /// Records carried in `data` when it is a list.
    pub fn records(&self) -> Vec<Value> {
        match &self.data {
            Value::Array(items) => items.clone(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
#[path = "envelope_tests.rs"]
mod tests;
