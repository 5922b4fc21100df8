//! Registry of live connections.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::net::SocketAddr;

use tokio::time::Instant;
use wordfuse_protocol::PlayerId;

use crate::{Session, SessionConfig, SessionError};

/// Tracks every connected player.
///
/// Not thread-safe on its own; the server wraps it in a `Mutex`.
pub struct SessionManager {
    sessions: HashMap<PlayerId, Session>,
    config: SessionConfig,
}

impl SessionManager {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: HashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Registers a freshly handshaken connection.
    ///
    /// # Errors
    ///
    /// - [`SessionError::AlreadyConnected`] if `player_id` is already live.
    /// - [`SessionError::CapacityReached`] if `max_sessions` are open.
    pub fn create(
        &mut self,
        player_id: PlayerId,
        peer_addr: SocketAddr,
    ) -> Result<&Session, SessionError> {
        if self.sessions.len() >= self.config.max_sessions
            && !self.sessions.contains_key(&player_id)
        {
            return Err(SessionError::CapacityReached(self.config.max_sessions));
        }

        match self.sessions.entry(player_id) {
            Entry::Occupied(_) => Err(SessionError::AlreadyConnected(player_id)),
            Entry::Vacant(slot) => {
                let now = Instant::now();
                tracing::info!(%player_id, %peer_addr, "session created");
                Ok(slot.insert(Session {
                    player_id,
                    peer_addr,
                    connected_at: now,
                    last_seen: now,
                    frames: 0,
                }))
            }
        }
    }

    /// Records that a frame arrived from `player_id`.
    pub fn touch(&mut self, player_id: PlayerId) -> Result<(), SessionError> {
        let session = self
            .sessions
            .get_mut(&player_id)
            .ok_or(SessionError::NotFound(player_id))?;
        session.last_seen = Instant::now();
        session.frames += 1;
        Ok(())
    }

    /// Removes the session, returning it.
    pub fn disconnect(&mut self, player_id: PlayerId) -> Result<Session, SessionError> {
        let session = self
            .sessions
            .remove(&player_id)
            .ok_or(SessionError::NotFound(player_id))?;
        tracing::info!(
            %player_id,
            frames = session.frames,
            online_secs = session.connected_at.elapsed().as_secs(),
            "session closed"
        );
        Ok(session)
    }

    /// When `player_id` counts as gone unless another frame arrives.
    pub fn idle_deadline(&self, player_id: &PlayerId) -> Option<Instant> {
        self.sessions
            .get(player_id)
            .map(|s| s.last_seen + self.config.idle_timeout)
    }

    pub fn get(&self, player_id: &PlayerId) -> Option<&Session> {
        self.sessions.get(player_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
