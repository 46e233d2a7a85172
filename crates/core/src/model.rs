// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Core offline-sync types.
//!
//! This module contains the fundamental data types: MutationKind,
//! ResourceClass, PendingMutation, and Partition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Category of user-initiated change that can be queued while offline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationKind {
    /// A logged workout session.
    Workout,
    /// A body measurement entry.
    Measurement,
}

impl MutationKind {
    /// Every kind, in drain order.
    pub const ALL: [MutationKind; 2] = [MutationKind::Workout, MutationKind::Measurement];

    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationKind::Workout => "workout",
            MutationKind::Measurement => "measurement",
        }
    }

    /// Collection path segment the mutation is submitted to.
    pub fn endpoint(&self) -> &'static str {
        self.resource().endpoint()
    }

    /// Resource class whose read model this kind of mutation affects.
    pub fn resource(&self) -> ResourceClass {
        match self {
            MutationKind::Workout => ResourceClass::Workouts,
            MutationKind::Measurement => ResourceClass::Measurements,
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MutationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "workout" | "workouts" => Ok(MutationKind::Workout),
            "measurement" | "measurements" => Ok(MutationKind::Measurement),
            _ => Err(Error::InvalidKind(s.to_string())),
        }
    }
}

/// A category of cacheable server data with its own cache partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceClass {
    Workouts,
    Measurements,
}

impl ResourceClass {
    pub const ALL: [ResourceClass; 2] = [ResourceClass::Workouts, ResourceClass::Measurements];

    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceClass::Workouts => "workouts",
            ResourceClass::Measurements => "measurements",
        }
    }

    /// Path segment under the API base URL.
    pub fn endpoint(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for ResourceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResourceClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "workouts" | "workout" => Ok(ResourceClass::Workouts),
            "measurements" | "measurement" => Ok(ResourceClass::Measurements),
            _ => Err(Error::InvalidResource(s.to_string())),
        }
    }
}

/// A mutation that could not be submitted and is waiting for a drain.
///
/// Immutable once enqueued: it is either deleted after a successful
/// submission or stays queued as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingMutation {
    pub id: String,
    pub kind: MutationKind,
    /// Body submitted to the API, verbatim.
    pub payload: Value,
    /// Credential captured at enqueue time.
    pub auth_token: String,
    /// Milliseconds since Unix epoch.
    pub enqueued_at: u64,
}

impl PendingMutation {
    /// Enqueue time as a UTC timestamp, if representable.
    pub fn enqueued_at_utc(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.enqueued_at).ok().and_then(DateTime::from_timestamp_millis)
    }
}

/// Independently clearable areas of the durable store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Partition {
    /// Mutations awaiting submission.
    Pending,
    /// Last-known-good read models.
    Cache,
    /// User preferences.
    Preferences,
    /// Stored HTTP responses for the request interception layer.
    Responses,
}

impl Partition {
    pub const ALL: [Partition; 4] =
        [Partition::Pending, Partition::Cache, Partition::Preferences, Partition::Responses];

    pub fn as_str(&self) -> &'static str {
        match self {
            Partition::Pending => "pending",
            Partition::Cache => "cache",
            Partition::Preferences => "preferences",
            Partition::Responses => "responses",
        }
    }

    pub(crate) fn table(&self) -> &'static str {
        match self {
            Partition::Pending => "pending_mutations",
            Partition::Cache => "cached_records",
            Partition::Preferences => "preferences",
            Partition::Responses => "response_cache",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Partition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Partition::Pending),
            "cache" => Ok(Partition::Cache),
            "preferences" | "prefs" => Ok(Partition::Preferences),
            "responses" => Ok(Partition::Responses),
            _ => Err(Error::InvalidPartition(s.to_string())),
        }
    }
}

/// Entry count and serialized size of one partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PartitionStats {
    pub count: usize,
    pub bytes: usize,
}

/// An HTTP response persisted in a named response cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredResponse {
    pub status: u16,
    /// Header name/value pairs in received order.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    /// Milliseconds since Unix epoch.
    pub stored_at: u64,
}

/// Server-assigned identifier of a cached record.
///
/// Looks at `_id` first, then `id`. Numeric ids are rendered as strings.
pub fn record_key(record: &Value) -> Option<String> {
    ["_id", "id"].iter().find_map(|field| match record.get(field) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
