use std::net::SocketAddr;
use std::time::Duration;

use tokio::time::Instant;
use wordfuse_protocol::PlayerId;

/// Limits applied to every session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Concurrent connections accepted before new ones are refused.
    pub max_sessions: usize,

    /// Silence after which a connection counts as gone. The default
    /// outlasts the longest default fuse; clients that may wait longer
    /// than this for their turn must heartbeat.
    pub idle_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_sessions: 1024,
            idle_timeout: Duration::from_secs(90),
        }
    }
}

/// One live connection.
#[derive(Debug, Clone)]
pub struct Session {
    pub player_id: PlayerId,
    pub peer_addr: SocketAddr,
    pub connected_at: Instant,
    /// Last time any frame arrived.
    pub last_seen: Instant,
    /// Frames received so far.
    pub frames: u64,
}

impl Session {
    /// How long the connection has been silent.
    pub fn idle_for(&self) -> Duration {
        self.last_seen.elapsed()
    }
}
