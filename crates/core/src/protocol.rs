// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket protocol messages for the realtime channel.
//!
//! Every frame is a JSON object tagged by `type`:
//! - Client frames carry `{type, payload, timestamp}`
//! - Server frames carry `{type, payload}`
//!
//! Unrecognized server tags parse into [`ServerMessage::Unknown`] so a newer
//! server cannot break dispatch on an older client.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Hub tag under which connection state changes are published.
pub const CONNECTION_EVENT: &str = "connection";
/// Hub tag under which transport errors are published.
pub const ERROR_EVENT: &str = "error";

/// Messages sent from server to client.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    /// A workout was created or changed on the server.
    WorkoutUpdate(Value),
    /// A measurement was created or changed on the server.
    MeasurementUpdate(Value),
    /// Aggregated user statistics changed.
    UserStatsUpdate(Value),
    /// A user-facing notification.
    Notification(Value),
    /// State of a live workout session.
    LiveWorkoutSession(Value),
    /// Heartbeat response.
    Pong(Value),
    /// A well-formed frame with a tag this client does not know.
    Unknown { kind: String, payload: Value },
}

/// Raw `{type, payload}` shape shared by every inbound frame.
#[derive(Deserialize)]
struct RawFrame {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Value,
}

impl ServerMessage {
    /// Deserializes the message from JSON.
    ///
    /// Fails only when the frame is not a JSON object with a string `type`.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        let raw: RawFrame = serde_json::from_str(s)?;
        Ok(Self::from_parts(raw.kind, raw.payload))
    }

    fn from_parts(kind: String, payload: Value) -> Self {
        match kind.as_str() {
            "workout_update" => ServerMessage::WorkoutUpdate(payload),
            "measurement_update" => ServerMessage::MeasurementUpdate(payload),
            "user_stats_update" => ServerMessage::UserStatsUpdate(payload),
            "notification" => ServerMessage::Notification(payload),
            "live_workout_session" => ServerMessage::LiveWorkoutSession(payload),
            "pong" => ServerMessage::Pong(payload),
            _ => ServerMessage::Unknown { kind, payload },
        }
    }

    /// Wire tag of the frame.
    pub fn kind(&self) -> &str {
        match self {
            ServerMessage::WorkoutUpdate(_) => "workout_update",
            ServerMessage::MeasurementUpdate(_) => "measurement_update",
            ServerMessage::UserStatsUpdate(_) => "user_stats_update",
            ServerMessage::Notification(_) => "notification",
            ServerMessage::LiveWorkoutSession(_) => "live_workout_session",
            ServerMessage::Pong(_) => "pong",
            ServerMessage::Unknown { kind, .. } => kind,
        }
    }

    /// Hub tag the payload is fanned out under.
    ///
    /// `None` for heartbeat responses and unknown frames, which are not
    /// published.
    pub fn event_tag(&self) -> Option<&'static str> {
        match self {
            ServerMessage::WorkoutUpdate(_) => Some("workout_update"),
            ServerMessage::MeasurementUpdate(_) => Some("measurement_update"),
            ServerMessage::UserStatsUpdate(_) => Some("user_stats_update"),
            ServerMessage::Notification(_) => Some("notification"),
            ServerMessage::LiveWorkoutSession(_) => Some("live_workout"),
            ServerMessage::Pong(_) | ServerMessage::Unknown { .. } => None,
        }
    }

    pub fn payload(&self) -> &Value {
        match self {
            ServerMessage::WorkoutUpdate(p)
            | ServerMessage::MeasurementUpdate(p)
            | ServerMessage::UserStatsUpdate(p)
            | ServerMessage::Notification(p)
            | ServerMessage::LiveWorkoutSession(p)
            | ServerMessage::Pong(p) => p,
            ServerMessage::Unknown { payload, .. } => payload,
        }
    }

    /// Serializes the message to JSON (used by test servers).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&json!({ "type": self.kind(), "payload": self.payload() }))
    }
}

/// Messages sent from client to server.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    /// Heartbeat probe.
    Ping,
    StartLiveWorkout(Value),
    UpdateLiveWorkout(Value),
    EndLiveWorkout { workout_id: String },
    SyncOfflineData(Value),
    RequestStatsUpdate,
    /// Any other tag, for forward compatibility.
    Custom { kind: String, payload: Value },
}

/// Outbound wire envelope.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ClientFrame {
    #[serde(rename = "type")]
    pub kind: String,
    pub payload: Value,
    /// Milliseconds since Unix epoch at send time.
    pub timestamp: u64,
}

impl ClientMessage {
    /// Creates a message from a raw tag and payload.
    pub fn custom(kind: impl Into<String>, payload: Value) -> Self {
        ClientMessage::Custom { kind: kind.into(), payload }
    }

    /// Wire tag of the message.
    pub fn kind(&self) -> &str {
        match self {
            ClientMessage::Ping => "ping",
            ClientMessage::StartLiveWorkout(_) => "start_live_workout",
            ClientMessage::UpdateLiveWorkout(_) => "update_live_workout",
            ClientMessage::EndLiveWorkout { .. } => "end_live_workout",
            ClientMessage::SyncOfflineData(_) => "sync_offline_data",
            ClientMessage::RequestStatsUpdate => "request_stats_update",
            ClientMessage::Custom { kind, .. } => kind,
        }
    }

    /// Payload as sent on the wire.
    pub fn payload(&self) -> Value {
        match self {
            ClientMessage::Ping | ClientMessage::RequestStatsUpdate => json!({}),
            ClientMessage::StartLiveWorkout(p)
            | ClientMessage::UpdateLiveWorkout(p)
            | ClientMessage::SyncOfflineData(p) => p.clone(),
            ClientMessage::EndLiveWorkout { workout_id } => json!({ "workoutId": workout_id }),
            ClientMessage::Custom { payload, .. } => payload.clone(),
        }
    }

    /// Builds the wire envelope stamped with the given time.
    pub fn to_frame(&self, timestamp: u64) -> ClientFrame {
        ClientFrame { kind: self.kind().to_string(), payload: self.payload(), timestamp }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self, timestamp: u64) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.to_frame(timestamp))
    }
}

impl ClientFrame {
    /// Deserializes the frame from JSON (used by test servers).
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
