// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Realtime channel client.
//!
//! Owns at most one live connection. `connect` is single-flight: callers that
//! arrive while an attempt is running join it. Once connected, a session task
//! forwards queued outbound frames, sends a heartbeat ping on a fixed interval
//! and fans inbound frames out through the [`EventHub`].
//!
//! A connection that ends without a clean close (or an attempt that fails or
//! times out) schedules a reconnect after `base * 2^(attempt - 1)`, up to the
//! configured attempt limit. The counter resets only on a successful connect.
//! [`ChannelClient::disconnect`] bumps the generation, which turns every task
//! still holding the old one into a no-op.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use ft_core::protocol::{CONNECTION_EVENT, ERROR_EVENT};
use ft_core::{ClientMessage, ClockSource, ServerMessage, SystemClock};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use super::backoff::Backoff;
use super::transport::{Connection, Transport, WebSocketTransport};
use crate::flight::Flight;
use crate::hub::{EventHub, Subscription};

/// Channel connection settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelConfig {
    /// Server URL without the token query parameter.
    pub url: String,
    pub connect_timeout: Duration,
    pub heartbeat_interval: Duration,
    pub reconnect_base_delay: Duration,
    pub max_reconnect_attempts: u32,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        ChannelConfig {
            url: "ws://localhost:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            heartbeat_interval: Duration::from_secs(30),
            reconnect_base_delay: Duration::from_secs(1),
            max_reconnect_attempts: 5,
        }
    }
}

impl ChannelConfig {
    pub fn backoff(&self) -> Backoff {
        Backoff::new(self.reconnect_base_delay, self.max_reconnect_attempts)
    }
}

/// Error type for channel operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChannelError {
    #[error("invalid channel url: {0}")]
    InvalidUrl(String),

    #[error("connect timed out after {0:?}")]
    Timeout(Duration),

    #[error("channel transport failed: {0}")]
    Transport(String),

    /// The client was disconnected while the attempt was running.
    #[error("connect cancelled by disconnect")]
    Cancelled,

    #[error("connect aborted: {0}")]
    Aborted(String),
}

impl From<JoinError> for ChannelError {
    fn from(e: JoinError) -> Self {
        ChannelError::Aborted(e.to_string())
    }
}

/// Connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelStatus {
    Disconnected,
    Connecting,
    Connected,
}

impl ChannelStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ChannelStatus::Disconnected => "disconnected",
            ChannelStatus::Connecting => "connecting",
            ChannelStatus::Connected => "connected",
        }
    }
}

impl std::fmt::Display for ChannelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot returned by [`ChannelClient::status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub status: ChannelStatus,
    pub reconnect_attempts: u32,
    pub subscriber_count: usize,
    /// Delay of the pending reconnect, if one is scheduled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_reconnect_delay_ms: Option<u64>,
}

struct State {
    status: ChannelStatus,
    generation: u64,
    reconnect_attempts: u32,
    next_reconnect_delay: Option<Duration>,
    outbound: Option<mpsc::UnboundedSender<String>>,
    session: Option<CancellationToken>,
    reconnect_timer: Option<JoinHandle<()>>,
    subscriptions: Vec<Subscription>,
}

struct Inner {
    config: ChannelConfig,
    backoff: Backoff,
    transport: Arc<dyn Transport>,
    hub: EventHub,
    clock: Arc<dyn ClockSource>,
    state: Mutex<State>,
    flight: Flight<(), ChannelError>,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Client for the realtime channel.
///
/// Cloning yields another handle to the same connection.
#[derive(Clone)]
pub struct ChannelClient {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for ChannelClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelClient")
            .field("url", &self.inner.config.url)
            .field("status", &self.inner.lock().status)
            .finish()
    }
}

impl ChannelClient {
    pub fn new(config: ChannelConfig, transport: Arc<dyn Transport>, hub: EventHub) -> Self {
        Self::with_clock(config, transport, hub, Arc::new(SystemClock))
    }

    /// Client backed by a real WebSocket transport.
    pub fn websocket(config: ChannelConfig, hub: EventHub) -> Self {
        Self::new(config, Arc::new(WebSocketTransport::new()), hub)
    }

    pub fn with_clock(
        config: ChannelConfig,
        transport: Arc<dyn Transport>,
        hub: EventHub,
        clock: Arc<dyn ClockSource>,
    ) -> Self {
        let backoff = config.backoff();
        let state = State {
            status: ChannelStatus::Disconnected,
            generation: 0,
            reconnect_attempts: 0,
            next_reconnect_delay: None,
            outbound: None,
            session: None,
            reconnect_timer: None,
            subscriptions: Vec::new(),
        };
        ChannelClient {
            inner: Arc::new(Inner {
                config,
                backoff,
                transport,
                hub,
                clock,
                state: Mutex::new(state),
                flight: Flight::new(),
            }),
        }
    }

    /// Connect with `token`, or join the attempt already running.
    ///
    /// Returns immediately when already connected.
    pub async fn connect(&self, token: &str) -> Result<(), ChannelError> {
        let generation = {
            let mut state = self.inner.lock();
            if state.status == ChannelStatus::Connected {
                return Ok(());
            }
            if let Some(timer) = state.reconnect_timer.take() {
                timer.abort();
                state.next_reconnect_delay = None;
            }
            state.generation
        };
        start_attempt(&self.inner, token.to_string(), generation).await
    }

    /// Queue a frame of type `kind`. Returns false when not connected.
    pub fn send(&self, kind: &str, payload: Value) -> bool {
        self.send_message(&ClientMessage::custom(kind, payload))
    }

    /// Queue a typed outbound message. Returns false when not connected.
    pub fn send_message(&self, message: &ClientMessage) -> bool {
        let state = self.inner.lock();
        let outbound = match (&state.outbound, state.status) {
            (Some(outbound), ChannelStatus::Connected) => outbound,
            _ => {
                warn!(kind = message.kind(), "channel not connected, message not sent");
                return false;
            }
        };
        match message.to_json(self.inner.clock.now_ms()) {
            Ok(frame) => outbound.send(frame).is_ok(),
            Err(e) => {
                warn!(kind = message.kind(), error = %e, "failed to encode outbound message");
                false
            }
        }
    }

    pub fn start_live_workout(&self, workout: Value) -> bool {
        self.send_message(&ClientMessage::StartLiveWorkout(workout))
    }

    pub fn update_live_workout(&self, update: Value) -> bool {
        self.send_message(&ClientMessage::UpdateLiveWorkout(update))
    }

    pub fn end_live_workout(&self, workout_id: &str) -> bool {
        self.send_message(&ClientMessage::EndLiveWorkout { workout_id: workout_id.to_string() })
    }

    pub fn sync_offline_data(&self, data: Value) -> bool {
        self.send_message(&ClientMessage::SyncOfflineData(data))
    }

    pub fn request_stats_update(&self) -> bool {
        self.send_message(&ClientMessage::RequestStatsUpdate)
    }

    /// Subscribe to a hub tag for the lifetime of this connection.
    ///
    /// [`ChannelClient::disconnect`] removes every subscription made here.
    pub fn subscribe<F>(&self, tag: &str, handler: F) -> Subscription
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let subscription = self.inner.hub.on(tag, handler);
        let mut state = self.inner.lock();
        // Handles the caller already unsubscribed
        state.subscriptions.retain(Subscription::is_active);
        state.subscriptions.push(subscription.clone());
        subscription
    }

    #[cfg(test)]
    pub(crate) fn tracked_subscriptions(&self) -> usize {
        self.inner.lock().subscriptions.len()
    }

    /// Close the connection and cancel every timer.
    ///
    /// No reconnect follows. A `connect` still in flight resolves with
    /// [`ChannelError::Cancelled`].
    pub fn disconnect(&self) {
        let (was, subscriptions) = {
            let mut state = self.inner.lock();
            state.generation = state.generation.wrapping_add(1);
            if let Some(session) = state.session.take() {
                session.cancel();
            }
            if let Some(timer) = state.reconnect_timer.take() {
                timer.abort();
            }
            state.outbound = None;
            state.next_reconnect_delay = None;
            let was = std::mem::replace(&mut state.status, ChannelStatus::Disconnected);
            (was, std::mem::take(&mut state.subscriptions))
        };
        self.inner.flight.reset();

        for subscription in &subscriptions {
            subscription.unsubscribe();
        }
        if was != ChannelStatus::Disconnected {
            info!(url = %self.inner.config.url, "realtime channel disconnected");
            self.inner.hub.publish(CONNECTION_EVENT, &json!({ "status": "disconnected" }));
        }
    }

    pub fn status(&self) -> StatusReport {
        let state = self.inner.lock();
        StatusReport {
            status: state.status,
            reconnect_attempts: state.reconnect_attempts,
            subscriber_count: self.inner.hub.total_subscribers(),
            next_reconnect_delay_ms: state
                .next_reconnect_delay
                .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.inner.lock().status == ChannelStatus::Connected
    }

    pub fn hub(&self) -> &EventHub {
        &self.inner.hub
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.inner.config
    }
}

/// `url` with the `token` query parameter appended.
pub fn channel_url(url: &str, token: &str) -> Result<Url, ChannelError> {
    let mut parsed = Url::parse(url).map_err(|_| ChannelError::InvalidUrl(url.to_string()))?;
    if !matches!(parsed.scheme(), "ws" | "wss") {
        return Err(ChannelError::InvalidUrl(url.to_string()));
    }
    parsed.query_pairs_mut().append_pair("token", token);
    Ok(parsed)
}

async fn start_attempt(inner: &Arc<Inner>, token: String, generation: u64) -> Result<(), ChannelError> {
    let owner = Arc::clone(inner);
    let (outcome, started) =
        inner.flight.join_or_spawn(move || establish(owner, token, generation));
    if !started {
        debug!("joining channel connect already in progress");
    }
    outcome.await
}

async fn establish(inner: Arc<Inner>, token: String, generation: u64) -> Result<(), ChannelError> {
    let url = channel_url(&inner.config.url, &token)?;
    {
        let mut state = inner.lock();
        if state.generation != generation {
            return Err(ChannelError::Cancelled);
        }
        state.status = ChannelStatus::Connecting;
    }
    debug!(url = %inner.config.url, "opening realtime channel");

    let timeout = inner.config.connect_timeout;
    let opened = match tokio::time::timeout(timeout, inner.transport.open(&url)).await {
        Ok(Ok(connection)) => connection,
        Ok(Err(e)) => {
            let err = ChannelError::Transport(e.to_string());
            return Err(attempt_failed(&inner, generation, token, err));
        }
        Err(_) => {
            return Err(attempt_failed(&inner, generation, token, ChannelError::Timeout(timeout)));
        }
    };

    let session = {
        let mut state = inner.lock();
        if state.generation == generation {
            let (tx, rx) = mpsc::unbounded_channel();
            let cancel = CancellationToken::new();
            state.status = ChannelStatus::Connected;
            state.reconnect_attempts = 0;
            state.next_reconnect_delay = None;
            state.outbound = Some(tx);
            state.session = Some(cancel.clone());
            Some((rx, cancel))
        } else {
            None
        }
    };
    let Some((outbound, cancel)) = session else {
        let mut connection = opened;
        let _ = connection.sink.close().await;
        return Err(ChannelError::Cancelled);
    };

    info!(url = %inner.config.url, "realtime channel connected");
    tokio::spawn(run_session(Arc::clone(&inner), opened, outbound, cancel, generation, token));
    inner.hub.publish(CONNECTION_EVENT, &json!({ "status": "connected" }));
    Ok(())
}

/// Record a failed attempt and feed the backoff. Returns the error to report.
fn attempt_failed(
    inner: &Arc<Inner>,
    generation: u64,
    token: String,
    err: ChannelError,
) -> ChannelError {
    {
        let mut state = inner.lock();
        if state.generation != generation {
            return ChannelError::Cancelled;
        }
        state.status = ChannelStatus::Disconnected;
    }
    warn!(url = %inner.config.url, error = %err, "realtime channel connect failed");
    inner.hub.publish(ERROR_EVENT, &json!({ "error": "Connection error" }));
    inner.hub.publish(CONNECTION_EVENT, &json!({ "status": "disconnected" }));
    schedule_reconnect(inner, generation, token);
    err
}

async fn run_session(
    inner: Arc<Inner>,
    connection: Connection,
    mut outbound: mpsc::UnboundedReceiver<String>,
    cancel: CancellationToken,
    generation: u64,
    token: String,
) {
    let Connection { mut sink, mut stream } = connection;
    let period = inner.config.heartbeat_interval;
    let mut heartbeat = tokio::time::interval_at(Instant::now() + period, period);
    heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let clean = loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                if let Err(e) = sink.close().await {
                    debug!(error = %e, "close handshake failed");
                }
                break true;
            }
            Some(frame) = outbound.recv() => {
                if let Err(e) = sink.send(frame).await {
                    warn!(error = %e, "realtime channel send failed");
                    break false;
                }
            }
            _ = heartbeat.tick() => {
                let ping = ClientMessage::Ping.to_json(inner.clock.now_ms());
                match ping {
                    Ok(frame) => {
                        if let Err(e) = sink.send(frame).await {
                            warn!(error = %e, "heartbeat send failed");
                            break false;
                        }
                    }
                    Err(e) => warn!(error = %e, "failed to encode heartbeat"),
                }
            }
            received = stream.recv() => match received {
                Ok(Some(text)) => dispatch(&inner.hub, &text),
                Ok(None) => break true,
                Err(e) => {
                    warn!(error = %e, "realtime channel dropped");
                    break false;
                }
            }
        }
    };

    session_ended(&inner, generation, clean, token);
}

fn session_ended(inner: &Arc<Inner>, generation: u64, clean: bool, token: String) {
    {
        let mut state = inner.lock();
        if state.generation != generation {
            return;
        }
        state.status = ChannelStatus::Disconnected;
        state.outbound = None;
        state.session = None;
    }
    info!(url = %inner.config.url, clean, "realtime channel closed");
    inner.hub.publish(CONNECTION_EVENT, &json!({ "status": "disconnected" }));
    if !clean {
        schedule_reconnect(inner, generation, token);
    }
}

fn schedule_reconnect(inner: &Arc<Inner>, generation: u64, token: String) {
    let mut state = inner.lock();
    if state.generation != generation {
        return;
    }
    if !inner.backoff.allows(state.reconnect_attempts) {
        state.next_reconnect_delay = None;
        warn!(attempts = state.reconnect_attempts, "giving up on realtime channel reconnect");
        return;
    }

    state.reconnect_attempts += 1;
    let attempt = state.reconnect_attempts;
    let delay = inner.backoff.delay_for(attempt);
    state.next_reconnect_delay = Some(delay);
    info!(attempt, delay_ms = delay.as_millis() as u64, "scheduling realtime channel reconnect");

    let weak: Weak<Inner> = Arc::downgrade(inner);
    let timer = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let Some(inner) = weak.upgrade() else {
            return;
        };
        {
            let mut state = inner.lock();
            if state.generation != generation || state.status == ChannelStatus::Connected {
                return;
            }
            state.reconnect_timer = None;
            state.next_reconnect_delay = None;
        }
        if let Err(e) = start_attempt(&inner, token, generation).await {
            debug!(attempt, error = %e, "reconnect attempt failed");
        }
    });
    if let Some(previous) = state.reconnect_timer.replace(timer) {
        previous.abort();
    }
}

/// Fan one inbound frame out through the hub.
fn dispatch(hub: &EventHub, text: &str) {
    let message = match ServerMessage::from_json(text) {
        Ok(message) => message,
        Err(e) => {
            warn!(error = %e, "dropping malformed channel frame");
            return;
        }
    };
    match message.event_tag() {
        Some(tag) => {
            hub.publish(tag, message.payload());
        }
        None if matches!(message, ServerMessage::Pong(_)) => debug!("heartbeat acknowledged"),
        None => warn!(kind = message.kind(), "dropping channel frame of unknown type"),
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
