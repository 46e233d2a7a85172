// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Responses synthesized for API requests that failed with nothing cached.

use ft_core::{ApiEnvelope, ResourceClass};
use serde_json::json;
use url::Url;

use super::request::{Response, ResponseSource};

pub const OFFLINE_LIST_MESSAGE: &str = "Showing cached data - you are offline";
pub const OFFLINE_ERROR: &str = "You are offline and this data is not cached";

/// Offline stand-in for an API GET to `url`.
///
/// List endpoints get an empty success envelope, stats get zeroed totals,
/// everything else a 503 failure envelope. All are flagged `offline`.
pub fn offline_fallback(url: &Url) -> Response {
    let path = url.path();
    let is_list = ResourceClass::ALL
        .iter()
        .any(|resource| path.contains(&format!("/{}", resource.endpoint())));

    let (status, envelope) = if is_list {
        (200, ApiEnvelope::ok(json!([])).offline().with_message(OFFLINE_LIST_MESSAGE))
    } else if path.contains("/stats") {
        let zeroed = json!({
            "totalWorkouts": 0,
            "recentWorkouts": 0,
            "totalVolume": 0,
            "averageDuration": 0,
        });
        (200, ApiEnvelope::ok(zeroed).offline())
    } else {
        (503, ApiEnvelope::failure(OFFLINE_ERROR).offline())
    };

    let body = serde_json::to_value(&envelope).unwrap_or_else(|_| json!({ "success": false }));
    Response::json(status, &body).with_source(ResponseSource::Fallback)
}

#[cfg(test)]
#[path = "fallback_tests.rs"]
mod tests;
