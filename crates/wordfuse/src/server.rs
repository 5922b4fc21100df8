//! `WordfuseServer` builder and accept loop.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use wordfuse_dictionary::Dictionary;
use wordfuse_protocol::{Codec, JsonCodec};
use wordfuse_room::{RoomConfig, RoomManager};
use wordfuse_session::{SessionConfig, SessionManager};
use wordfuse_transport::{Transport, WebSocketTransport};

use crate::WordfuseError;
use crate::handler::handle_connection;

/// State shared by every connection task.
///
/// Neither lock is ever held while writing to a socket.
pub(crate) struct ServerState<D: Dictionary, C: Codec> {
    pub(crate) sessions: Mutex<SessionManager>,
    pub(crate) rooms: Mutex<RoomManager<D>>,
    pub(crate) codec: C,
    pub(crate) handshake_timeout: Duration,
}

/// Configures and binds a [`WordfuseServer`].
///
/// ```rust,ignore
/// let server = WordfuseServerBuilder::new()
///     .bind("0.0.0.0:8080")
///     .room_config(RoomConfig::default())
///     .build(dictionary)
///     .await?;
/// ```
pub struct WordfuseServerBuilder {
    bind_addr: String,
    room_config: RoomConfig,
    session_config: SessionConfig,
    handshake_timeout: Duration,
}

impl WordfuseServerBuilder {
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            room_config: RoomConfig::default(),
            session_config: SessionConfig::default(),
            handshake_timeout: Duration::from_secs(5),
        }
    }

    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    /// How long a new connection has to send its `hello`.
    pub fn handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    /// Binds the listener. Frames are JSON.
    pub async fn build<D: Dictionary>(
        self,
        dictionary: D,
    ) -> Result<WordfuseServer<D, JsonCodec>, WordfuseError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            sessions: Mutex::new(SessionManager::new(self.session_config)),
            rooms: Mutex::new(RoomManager::new(self.room_config, Arc::new(dictionary))),
            codec: JsonCodec,
            handshake_timeout: self.handshake_timeout,
        });

        Ok(WordfuseServer { transport, state })
    }
}

impl Default for WordfuseServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound server. Call [`run`](Self::run) to start accepting players.
pub struct WordfuseServer<D: Dictionary, C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<D, C>>,
}

impl<D: Dictionary, C: Codec> WordfuseServer<D, C> {
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.transport.local_addr()
    }

    /// Accepts connections until the task is dropped, one handler task
    /// per connection.
    pub async fn run(mut self) -> Result<(), WordfuseError> {
        tracing::info!(addr = ?self.local_addr().ok(), "wordfuse server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::warn!(error = %e, "accept failed");
                }
            }
        }
    }
}
