//! Registry of live rooms.

use std::collections::HashMap;
use std::sync::Arc;

use rand::Rng;
use wordfuse_dictionary::Dictionary;
use wordfuse_protocol::{PlayerId, PlayerView, RoomCode};

use crate::dispatch::PlayerSender;
use crate::game::{Game, RoomSnapshot};
use crate::room::spawn_room;
use crate::{RoomConfig, RoomError, RoomHandle};

/// Owns every room and knows which player sits where.
///
/// Rooms come into existence on [`create_room`](Self::create_room) and
/// disappear the moment their last player leaves. The manager itself is
/// not synchronized; the server keeps it behind a `Mutex`.
pub struct RoomManager<D: Dictionary> {
    rooms: HashMap<RoomCode, RoomHandle>,
    player_rooms: HashMap<PlayerId, RoomCode>,
    config: RoomConfig,
    dictionary: Arc<D>,
}

impl<D: Dictionary> RoomManager<D> {
    pub fn new(config: RoomConfig, dictionary: Arc<D>) -> Self {
        Self {
            rooms: HashMap::new(),
            player_rooms: HashMap::new(),
            config: config.validated(),
            dictionary,
        }
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    /// Opens a room with `host` seated and returns its code.
    ///
    /// `sender` receives the room's events for the host.
    pub fn create_room(
        &mut self,
        host: PlayerId,
        host_name: &str,
        lives: Option<i64>,
        peer_id: Option<String>,
        sender: PlayerSender,
    ) -> Result<RoomCode, RoomError> {
        self.ensure_unseated(host)?;

        let code = self.unused_code();
        let game = Game::new(code.clone(), self.config.clone(), host, host_name, lives, peer_id);
        let handle = spawn_room(game, (host, sender), Arc::clone(&self.dictionary));

        self.rooms.insert(code.clone(), handle);
        self.player_rooms.insert(host, code.clone());
        tracing::info!(room = %code, %host, rooms = self.rooms.len(), "room created");
        Ok(code)
    }

    pub async fn join_room(
        &mut self,
        player_id: PlayerId,
        code: &RoomCode,
        name: &str,
        peer_id: Option<String>,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        self.ensure_unseated(player_id)?;
        let handle = self.handle(code)?;

        handle
            .join(player_id, name.to_string(), peer_id, sender)
            .await?;
        self.player_rooms.insert(player_id, code.clone());
        Ok(())
    }

    /// Unseats `player_id` from whatever room they are in, deleting the room
    /// if it is now empty. Returns the room's code.
    pub async fn leave_room(&mut self, player_id: PlayerId) -> Result<RoomCode, RoomError> {
        let code = self
            .player_rooms
            .remove(&player_id)
            .ok_or(RoomError::NotInRoom(player_id))?;

        let remaining = match self.rooms.get(&code) {
            Some(handle) => match handle.leave(player_id).await {
                Ok(n) => n,
                Err(RoomError::Unavailable(_)) => 0,
                Err(e) => return Err(e),
            },
            None => 0,
        };

        if remaining == 0 {
            self.destroy_room(&code);
        }
        Ok(code)
    }

    /// Drops a room's handle and forgets its players. The actor stops when
    /// the last handle is gone, taking its fuse with it.
    fn destroy_room(&mut self, code: &RoomCode) {
        if self.rooms.remove(code).is_some() {
            self.player_rooms.retain(|_, c| c != code);
            tracing::info!(room = %code, rooms = self.rooms.len(), "room destroyed");
        }
    }

    pub async fn start_game(&self, player_id: PlayerId, code: &RoomCode) -> Result<(), RoomError> {
        self.handle(code)?.start(player_id).await
    }

    pub async fn submit_word(
        &self,
        player_id: PlayerId,
        code: &RoomCode,
        word: String,
    ) -> Result<(), RoomError> {
        self.handle(code)?.submit(player_id, word).await
    }

    pub async fn restart_game(
        &self,
        player_id: PlayerId,
        code: &RoomCode,
        lives: Option<i64>,
    ) -> Result<(), RoomError> {
        self.handle(code)?.restart(player_id, lives).await
    }

    /// Current roster. Never changes room state.
    pub async fn player_list(&self, code: &RoomCode) -> Result<Vec<PlayerView>, RoomError> {
        self.handle(code)?.player_list().await
    }

    pub async fn snapshot(&self, code: &RoomCode) -> Result<RoomSnapshot, RoomError> {
        self.handle(code)?.snapshot().await
    }

    pub fn player_room(&self, player_id: &PlayerId) -> Option<&RoomCode> {
        self.player_rooms.get(player_id)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn room_codes(&self) -> Vec<RoomCode> {
        self.rooms.keys().cloned().collect()
    }

    fn handle(&self, code: &RoomCode) -> Result<&RoomHandle, RoomError> {
        self.rooms
            .get(code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))
    }

    fn ensure_unseated(&self, player_id: PlayerId) -> Result<(), RoomError> {
        match self.player_rooms.get(&player_id) {
            Some(code) => Err(RoomError::AlreadyInRoom(player_id, code.clone())),
            None => Ok(()),
        }
    }

    /// Six hex digits, retried until unused.
    fn unused_code(&self) -> RoomCode {
        let mut rng = rand::rng();
        loop {
            let bytes: [u8; 3] = rng.random();
            let code = RoomCode::parse(&bytes.iter().map(|b| format!("{b:02X}")).collect::<String>());
            if !self.rooms.contains_key(&code) {
                return code;
            }
        }
    }
}
