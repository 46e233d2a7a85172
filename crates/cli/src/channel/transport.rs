// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for the realtime channel.
//!
//! Provides a trait-based transport layer that enables:
//! - Real WebSocket connections for production
//! - Mock transports for unit testing
//!
//! Opening a transport yields a [`Connection`] split into an outbound
//! [`FrameSink`] and an inbound [`FrameStream`] so the session loop can
//! write and read concurrently.

use std::future::Future;
use std::pin::Pin;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;
use url::Url;

/// Error type for transport operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    /// Connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Connection closed without a closing handshake.
    #[error("connection closed")]
    ConnectionClosed,

    /// Send failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Receive failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Boxed future returned by transport methods.
pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = TransportResult<T>> + Send + 'a>>;

/// Outbound half of an open connection.
pub trait FrameSink: Send {
    /// Send one text frame.
    fn send(&mut self, text: String) -> TransportFuture<'_, ()>;

    /// Start a clean closing handshake.
    fn close(&mut self) -> TransportFuture<'_, ()>;
}

/// Inbound half of an open connection.
pub trait FrameStream: Send {
    /// Receive the next text frame.
    ///
    /// Returns `Ok(None)` when the peer completed a clean close, and an
    /// error when the connection dropped without one.
    fn recv(&mut self) -> TransportFuture<'_, Option<String>>;
}

/// An open connection.
pub struct Connection {
    pub sink: Box<dyn FrameSink>,
    pub stream: Box<dyn FrameStream>,
}

/// Transport trait for WebSocket-like communication.
pub trait Transport: Send + Sync {
    /// Open a connection to `url`.
    fn open(&self, url: &Url) -> TransportFuture<'_, Connection>;
}

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// WebSocket transport implementation using tokio-tungstenite.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebSocketTransport;

impl WebSocketTransport {
    pub fn new() -> Self {
        WebSocketTransport
    }
}

impl Transport for WebSocketTransport {
    fn open(&self, url: &Url) -> TransportFuture<'_, Connection> {
        let url = url.to_string();
        Box::pin(async move {
            let (ws_stream, _) = tokio_tungstenite::connect_async(url.as_str())
                .await
                .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

            let (sink, stream) = ws_stream.split();
            Ok(Connection { sink: Box::new(WsSink(sink)), stream: Box::new(WsSource(stream)) })
        })
    }
}

struct WsSink(SplitSink<WsStream, Message>);

impl FrameSink for WsSink {
    fn send(&mut self, text: String) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            self.0
                .send(Message::Text(text.into()))
                .await
                .map_err(|e| TransportError::SendFailed(e.to_string()))
        })
    }

    fn close(&mut self) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            self.0.close().await.map_err(|e| TransportError::SendFailed(e.to_string()))
        })
    }
}

struct WsSource(SplitStream<WsStream>);

impl FrameStream for WsSource {
    fn recv(&mut self) -> TransportFuture<'_, Option<String>> {
        Box::pin(async move {
            loop {
                match self.0.next().await {
                    Some(Ok(Message::Text(text))) => return Ok(Some(text.as_str().to_owned())),
                    Some(Ok(Message::Close(_))) => return Ok(None),
                    // Ping/pong and binary frames carry nothing for us
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => return Err(TransportError::ReceiveFailed(e.to_string())),
                    None => return Err(TransportError::ConnectionClosed),
                }
            }
        })
    }
}
