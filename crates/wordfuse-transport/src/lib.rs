//! Sockets for wordfuse.
//!
//! The server is written against two small traits, [`Transport`] (a
//! listener) and [`Connection`] (one peer). Frames are opaque byte
//! buffers here; giving them meaning is the protocol crate's job.
//!
//! Cargo features:
//!
//! - `websocket` (default): [`WebSocketTransport`] over `tokio-tungstenite`,
//!   which is what browsers speak.

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnection, WebSocketTransport};

use std::fmt;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique number of an accepted connection.
///
/// Ids start at 1 and are never reused, so the server can hand them out
/// as ephemeral player identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Allocates the next unused id.
    pub fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// A listener handing out [`Connection`]s.
pub trait Transport: Send + Sync + 'static {
    type Connection: Connection;
    type Error: std::error::Error + Send + Sync;

    /// Waits for the next peer and completes any upgrade it needs.
    async fn accept(&mut self) -> Result<Self::Connection, Self::Error>;

    fn local_addr(&self) -> std::io::Result<SocketAddr>;
}

/// One peer. Takes `&self` everywhere so a task parked in
/// [`recv`](Connection::recv) never blocks a concurrent
/// [`send`](Connection::send).
pub trait Connection: Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync;

    async fn send(&self, frame: &[u8]) -> Result<(), Self::Error>;

    /// Next frame from the peer, or `Ok(None)` once the peer has closed.
    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error>;

    async fn close(&self) -> Result<(), Self::Error>;

    fn id(&self) -> ConnectionId;

    fn peer_addr(&self) -> SocketAddr;
}
