// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Mock transport for channel tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use url::Url;

use super::transport::{
    Connection, FrameSink, FrameStream, Transport, TransportError, TransportFuture,
};

/// How the mock answers one `open` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenBehaviour {
    Accept,
    AcceptAfter(Duration),
    Fail,
    Hang,
}

/// What the client wrote to a mock connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Frame(String),
    Closed,
}

enum Inbound {
    Frame(String),
    Close,
    Drop,
}

/// Server side of one mock connection.
pub struct MockPeer {
    pub url: Url,
    sent: mpsc::UnboundedReceiver<Sent>,
    inbound: mpsc::UnboundedSender<Inbound>,
}

impl MockPeer {
    /// Deliver a text frame to the client.
    pub fn push(&self, text: &str) {
        let _ = self.inbound.send(Inbound::Frame(text.to_string()));
    }

    /// Close with a completed handshake.
    pub fn close_clean(&self) {
        let _ = self.inbound.send(Inbound::Close);
    }

    /// Drop the connection without a closing handshake.
    pub fn drop_connection(&self) {
        let _ = self.inbound.send(Inbound::Drop);
    }

    /// Next thing the client wrote.
    pub async fn next_sent(&mut self) -> Option<Sent> {
        self.sent.recv().await
    }

    /// Next frame the client wrote, parsed as JSON.
    pub async fn next_frame(&mut self) -> serde_json::Value {
        match self.next_sent().await {
            Some(Sent::Frame(text)) => serde_json::from_str(&text).unwrap(),
            other => panic!("expected a frame, got {other:?}"),
        }
    }
}

/// Transport whose connections are driven by the test.
pub struct MockTransport {
    default: Mutex<OpenBehaviour>,
    script: Mutex<VecDeque<OpenBehaviour>>,
    opens: Mutex<Vec<(Instant, Url)>>,
    peers: Mutex<VecDeque<MockPeer>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(MockTransport {
            default: Mutex::new(OpenBehaviour::Accept),
            script: Mutex::new(VecDeque::new()),
            opens: Mutex::new(Vec::new()),
            peers: Mutex::new(VecDeque::new()),
        })
    }

    /// Behaviour once the script is exhausted.
    pub fn set_default(&self, behaviour: OpenBehaviour) {
        *self.default.lock().unwrap() = behaviour;
    }

    /// Queue a behaviour for the next `open`.
    pub fn script(&self, behaviour: OpenBehaviour) {
        self.script.lock().unwrap().push_back(behaviour);
    }

    pub fn open_count(&self) -> usize {
        self.opens.lock().unwrap().len()
    }

    pub fn open_times(&self) -> Vec<Instant> {
        self.opens.lock().unwrap().iter().map(|(at, _)| *at).collect()
    }

    pub fn opened_urls(&self) -> Vec<String> {
        self.opens.lock().unwrap().iter().map(|(_, url)| url.to_string()).collect()
    }

    /// Oldest accepted connection not yet taken.
    pub fn take_peer(&self) -> MockPeer {
        self.peers.lock().unwrap().pop_front().unwrap()
    }

    fn accept(&self, url: Url) -> Connection {
        let (sent_tx, sent_rx) = mpsc::unbounded_channel();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        self.peers.lock().unwrap().push_back(MockPeer { url, sent: sent_rx, inbound: inbound_tx });
        Connection {
            sink: Box::new(MockSink(sent_tx)),
            stream: Box::new(MockStream(inbound_rx)),
        }
    }
}

impl Transport for MockTransport {
    fn open(&self, url: &Url) -> TransportFuture<'_, Connection> {
        let url = url.clone();
        self.opens.lock().unwrap().push((Instant::now(), url.clone()));
        let scripted = self.script.lock().unwrap().pop_front();
        let behaviour = scripted.unwrap_or(*self.default.lock().unwrap());
        Box::pin(async move {
            match behaviour {
                OpenBehaviour::Accept => Ok(self.accept(url)),
                OpenBehaviour::AcceptAfter(delay) => {
                    tokio::time::sleep(delay).await;
                    Ok(self.accept(url))
                }
                OpenBehaviour::Fail => Err(TransportError::ConnectionFailed("refused".into())),
                OpenBehaviour::Hang => std::future::pending().await,
            }
        })
    }
}

struct MockSink(mpsc::UnboundedSender<Sent>);

impl FrameSink for MockSink {
    fn send(&mut self, text: String) -> TransportFuture<'_, ()> {
        let _ = self.0.send(Sent::Frame(text));
        Box::pin(async { Ok(()) })
    }

    fn close(&mut self) -> TransportFuture<'_, ()> {
        let _ = self.0.send(Sent::Closed);
        Box::pin(async { Ok(()) })
    }
}

struct MockStream(mpsc::UnboundedReceiver<Inbound>);

impl FrameStream for MockStream {
    fn recv(&mut self) -> TransportFuture<'_, Option<String>> {
        Box::pin(async move {
            match self.0.recv().await {
                Some(Inbound::Frame(text)) => Ok(Some(text)),
                Some(Inbound::Close) => Ok(None),
                Some(Inbound::Drop) | None => Err(TransportError::ConnectionClosed),
            }
        })
    }
}
