// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Realtime channel: one persistent WebSocket connection to the server.
//!
//! ```text
//! ChannelClient ──open──▶ Transport ──▶ Connection { sink, stream }
//!       │                                        │
//!       │ send / heartbeat ───────────────▶ sink │
//!       ▼                                        ▼
//!   EventHub ◀──────── dispatch ◀──────────── stream
//! ```

mod backoff;
mod client;
mod transport;

pub use backoff::Backoff;
pub use client::{
    channel_url, ChannelClient, ChannelConfig, ChannelError, ChannelStatus, StatusReport,
};
pub use transport::{
    Connection, FrameSink, FrameStream, Transport, TransportError, TransportFuture,
    TransportResult, WebSocketTransport,
};

#[cfg(test)]
pub(crate) mod test_helpers;
