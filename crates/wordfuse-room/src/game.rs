//! The per-room game: turn rotation, the bomb, submissions, elimination.
//!
//! [`Game`] is a plain state machine with no I/O. Every mutation appends
//! the events it causes to an outbox, in causal order; the room actor
//! drains it with [`Game::take_outbox`] after each step and hands it to
//! the dispatcher.
//!
//! Two kinds of deferred work re-enter the game: fuse detonations and
//! dictionary verdicts. Both carry the turn marker they were started
//! under and are discarded if the turn has moved on.

use std::collections::HashSet;
use std::time::Duration;

use tracing::{debug, info};
use wordfuse_dictionary::{Rejection, precheck};
use wordfuse_fuse::{Detonation, Fuse};
use wordfuse_protocol::{PlayerId, PlayerView, Recipient, RoomCode, ScoreEntry, ServerMessage};

use crate::prompt::draw_prompt;
use crate::{RoomConfig, RoomError, RoomStatus};

/// An event and who should receive it.
pub type Outbound = (Recipient, ServerMessage);

/// A seated player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub lives: u32,
    /// False iff `lives == 0`.
    pub is_alive: bool,
    /// Rounds won; survives restarts.
    pub wins: u32,
    pub peer_id: Option<String>,
}

impl Player {
    fn new(id: PlayerId, name: String, lives: u32, peer_id: Option<String>) -> Self {
        Self {
            id,
            name,
            lives,
            is_alive: true,
            wins: 0,
            peer_id,
        }
    }
}

/// A submission that passed the local rules and awaits the dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLookup {
    pub turn: u64,
    pub player: PlayerId,
    /// Normalized form of the submission.
    pub word: String,
}

/// Read-only view of a room for diagnostics and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSnapshot {
    pub code: RoomCode,
    pub status: RoomStatus,
    pub host: PlayerId,
    pub lives_per_player: u32,
    pub players: Vec<PlayerView>,
    pub current_player: Option<PlayerId>,
    pub prompt: String,
    pub used_words: usize,
    /// Time left on the armed fuse.
    pub fuse_remaining: Option<Duration>,
    pub turn: u64,
}

fn display_name(raw: &str, fallback: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

/// State of one room.
#[derive(Debug)]
pub struct Game {
    code: RoomCode,
    config: RoomConfig,
    host: PlayerId,
    lives_per_player: u32,
    /// Seating order is turn order.
    players: Vec<Player>,
    status: RoomStatus,
    prompt: String,
    current: usize,
    used_words: HashSet<String>,
    /// Bumped every time a turn is armed.
    turn: u64,
    /// Players seated when the current round began.
    round_size: usize,
    fuse: Fuse,
    outbox: Vec<Outbound>,
}

impl Game {
    /// Opens a room in the lobby with the host as its only player.
    pub fn new(
        code: RoomCode,
        config: RoomConfig,
        host: PlayerId,
        host_name: &str,
        lives: Option<i64>,
        peer_id: Option<String>,
    ) -> Self {
        let lives_per_player = config.clamp_lives(lives);
        let host_player = Player::new(host, display_name(host_name, "Host"), lives_per_player, peer_id);
        let mut game = Self {
            code,
            fuse: Fuse::new(config.fuse),
            config,
            host,
            lives_per_player,
            players: vec![host_player],
            status: RoomStatus::Lobby,
            prompt: String::new(),
            current: 0,
            used_words: HashSet::new(),
            turn: 0,
            round_size: 0,
            outbox: Vec::new(),
        };
        game.broadcast_roster();
        game
    }

    // =======================================================================
    // Membership
    // =======================================================================

    /// Seats a player. Only possible in the lobby.
    pub fn add_player(
        &mut self,
        id: PlayerId,
        name: &str,
        peer_id: Option<String>,
    ) -> Result<(), RoomError> {
        if self.seat_of(id).is_some() {
            return Err(RoomError::AlreadyInRoom(id, self.code.clone()));
        }
        if !self.status.is_joinable() {
            return Err(RoomError::GameAlreadyStarted(self.code.clone()));
        }
        if self.players.len() >= self.config.max_players {
            return Err(RoomError::RoomFull {
                code: self.code.clone(),
                max: self.config.max_players,
            });
        }

        let name = display_name(name, "Player");
        info!(room = %self.code, player_id = %id, %name, "player joined");
        self.players
            .push(Player::new(id, name, self.lives_per_player, peer_id));
        self.broadcast_roster();
        Ok(())
    }

    /// Unseats a player and returns how many remain.
    ///
    /// Host rights pass to the first remaining player. Mid-round, the
    /// departure of the current player forfeits their turn, and any
    /// departure may end the round.
    pub fn remove_player(&mut self, id: PlayerId) -> Result<usize, RoomError> {
        let idx = self.seat_of(id).ok_or(RoomError::NotInRoom(id))?;
        let gone = self.players.remove(idx);
        info!(room = %self.code, player_id = %id, remaining = self.players.len(), "player left");

        if self.players.is_empty() {
            self.fuse.cancel();
            return Ok(0);
        }

        if gone.id == self.host {
            self.host = self.players[0].id;
            info!(room = %self.code, host = %self.host, "host rights passed on");
        }

        self.broadcast_roster();

        if self.status.is_playing() {
            if idx == self.current {
                // Resume from the seat before the leaver.
                self.fuse.cancel();
                self.current = (idx + self.players.len() - 1) % self.players.len();
                self.move_to_next_turn();
            } else {
                if idx < self.current {
                    self.current -= 1;
                }
                self.check_game_over();
            }
        } else if self.current >= self.players.len() {
            self.current = 0;
        }

        Ok(self.players.len())
    }

    // =======================================================================
    // Round lifecycle
    // =======================================================================

    /// Starts the first round. Host only, lobby only.
    pub fn start(&mut self, by: PlayerId) -> Result<(), RoomError> {
        self.authorize(by, "start")?;
        if !self.status.is_joinable() {
            return Err(RoomError::GameAlreadyStarted(self.code.clone()));
        }
        self.require_quorum()?;

        self.begin_round();
        info!(room = %self.code, players = self.players.len(), "game started");
        self.push(
            Recipient::All,
            ServerMessage::GameStarted {
                prompt: self.prompt.clone(),
                current_player_id: self.players[0].id,
            },
        );
        self.start_turn();
        Ok(())
    }

    /// Starts a fresh round with everyone revived. Wins are kept.
    ///
    /// `lives` replaces the room's setting when present (clamped).
    pub fn restart(&mut self, by: PlayerId, lives: Option<i64>) -> Result<(), RoomError> {
        self.authorize(by, "restart")?;
        self.require_quorum()?;

        if lives.is_some() {
            self.lives_per_player = self.config.clamp_lives(lives);
        }
        for player in &mut self.players {
            player.lives = self.lives_per_player;
            player.is_alive = true;
        }

        self.begin_round();
        info!(room = %self.code, lives = self.lives_per_player, "game restarted");
        self.push(
            Recipient::All,
            ServerMessage::GameRestarted {
                lives_per_player: self.lives_per_player,
                prompt: self.prompt.clone(),
                current_player_id: self.players[0].id,
                players: self.roster(),
            },
        );
        self.start_turn();
        Ok(())
    }

    fn authorize(&self, by: PlayerId, action: &'static str) -> Result<(), RoomError> {
        if self.seat_of(by).is_none() {
            return Err(RoomError::NotInRoom(by));
        }
        if by != self.host {
            return Err(RoomError::NotAuthorized { player: by, action });
        }
        Ok(())
    }

    fn require_quorum(&self) -> Result<(), RoomError> {
        if self.players.len() < self.config.min_players {
            return Err(RoomError::InsufficientPlayers {
                needed: self.config.min_players,
                have: self.players.len(),
            });
        }
        Ok(())
    }

    fn begin_round(&mut self) {
        self.fuse.cancel();
        self.set_status(RoomStatus::Playing);
        self.prompt = draw_prompt().to_string();
        self.current = 0;
        self.used_words.clear();
        self.round_size = self.players.len();
    }

    // =======================================================================
    // Turns
    // =======================================================================

    fn start_turn(&mut self) {
        if self.check_game_over() {
            return;
        }

        if !self.players.get(self.current).is_some_and(|p| p.is_alive) {
            match self.next_alive_after(self.current) {
                Some(next) => self.current = next,
                None => return,
            }
        }
        let Some(player) = self.players.get(self.current) else {
            return;
        };
        let player_id = player.id;

        self.turn += 1;
        let length = self.fuse.draw();
        debug!(room = %self.code, %player_id, turn = self.turn, secs = length.as_secs(), "turn started");
        self.push(
            Recipient::All,
            ServerMessage::TurnStarted {
                current_player_id: player_id,
                prompt: self.prompt.clone(),
                bomb_time: length.as_secs(),
            },
        );
        self.fuse.arm(self.turn, length);
    }

    fn move_to_next_turn(&mut self) {
        self.fuse.cancel();
        if self.check_game_over() {
            return;
        }
        let Some(next) = self.next_alive_after(self.current) else {
            self.check_game_over();
            return;
        };

        self.current = next;
        self.prompt = draw_prompt().to_string();
        self.push(
            Recipient::All,
            ServerMessage::NextTurn {
                current_player_id: self.players[next].id,
                prompt: self.prompt.clone(),
            },
        );
        self.start_turn();
    }

    /// First alive seat after `from`, wrapping; may return `from` itself.
    fn next_alive_after(&self, from: usize) -> Option<usize> {
        let len = self.players.len();
        (1..=len)
            .map(|step| (from + step) % len)
            .find(|&i| self.players[i].is_alive)
    }

    /// Applies a burnt-down fuse to the current player.
    ///
    /// Ignored unless it belongs to the running turn.
    pub fn detonate(&mut self, boom: Detonation) {
        if !self.status.is_playing() || boom.turn != self.turn {
            debug!(room = %self.code, turn = boom.turn, current = self.turn, "stale detonation ignored");
            return;
        }
        let Some(player) = self.players.get_mut(self.current) else {
            return;
        };
        player.lives = player.lives.saturating_sub(1);
        let eliminated = player.lives == 0;
        if eliminated {
            player.is_alive = false;
        }
        let (player_id, remaining_lives) = (player.id, player.lives);

        info!(room = %self.code, %player_id, remaining_lives, "bomb exploded");
        self.push(
            Recipient::All,
            ServerMessage::BombExploded {
                player_id,
                remaining_lives,
            },
        );

        if eliminated {
            let over = self.game_over_holds();
            self.push(Recipient::All, ServerMessage::PlayerEliminated { player_id });
            self.broadcast_roster();
            if over {
                self.finish();
            } else {
                self.move_to_next_turn();
            }
        } else {
            self.broadcast_roster();
            self.move_to_next_turn();
        }
    }

    // =======================================================================
    // Submissions
    // =======================================================================

    /// Runs the local rules on a submission.
    ///
    /// Returns the lookup to perform when the word passes; rule failures
    /// are reported to the submitter here. Submissions from anyone but the
    /// current player, or outside a round, are dropped silently.
    pub fn begin_submission(&mut self, by: PlayerId, word: &str) -> Option<PendingLookup> {
        if !self.status.is_playing() || self.current_player_id() != Some(by) {
            debug!(room = %self.code, player_id = %by, "submission out of turn ignored");
            return None;
        }
        match precheck(word, &self.prompt, &self.used_words) {
            Ok(word) => Some(PendingLookup {
                turn: self.turn,
                player: by,
                word,
            }),
            Err(rejection) => {
                self.reject(by, rejection);
                None
            }
        }
    }

    /// Applies a dictionary verdict. Returns whether the word was accepted.
    ///
    /// Verdicts for a turn that already ended are discarded without effect.
    pub fn finish_submission(&mut self, lookup: PendingLookup, verdict: Result<(), Rejection>) -> bool {
        if !self.is_current_turn(&lookup) {
            debug!(room = %self.code, word = %lookup.word, turn = lookup.turn, "stale lookup discarded");
            return false;
        }
        if let Err(rejection) = verdict {
            self.reject(lookup.player, rejection);
            return false;
        }
        if self.used_words.contains(&lookup.word) {
            self.reject(lookup.player, Rejection::AlreadyUsed);
            return false;
        }

        self.fuse.cancel();
        self.used_words.insert(lookup.word.clone());
        info!(room = %self.code, player_id = %lookup.player, word = %lookup.word, "word accepted");
        self.push(
            Recipient::All,
            ServerMessage::WordAccepted {
                player_id: lookup.player,
                word: lookup.word,
            },
        );
        self.move_to_next_turn();
        true
    }

    fn is_current_turn(&self, lookup: &PendingLookup) -> bool {
        self.status.is_playing()
            && lookup.turn == self.turn
            && self.current_player_id() == Some(lookup.player)
    }

    fn reject(&mut self, player: PlayerId, rejection: Rejection) {
        debug!(room = %self.code, player_id = %player, ?rejection, "word rejected");
        self.push(
            Recipient::Player(player),
            ServerMessage::WordInvalid {
                reason: rejection.to_string(),
            },
        );
    }

    // =======================================================================
    // Game over
    // =======================================================================

    /// Playing, at most one player alive, and the round began with more
    /// than one player.
    pub fn game_over_holds(&self) -> bool {
        self.status.is_playing()
            && self.players.iter().filter(|p| p.is_alive).count() <= 1
            && self.round_size > 1
    }

    fn check_game_over(&mut self) -> bool {
        if self.game_over_holds() {
            self.finish();
            true
        } else {
            false
        }
    }

    fn set_status(&mut self, next: RoomStatus) {
        debug_assert!(
            self.status.can_transition_to(next),
            "illegal room transition {} -> {next}",
            self.status
        );
        debug!(room = %self.code, from = %self.status, to = %next, "room status changed");
        self.status = next;
    }

    fn finish(&mut self) {
        self.set_status(RoomStatus::Over);
        self.fuse.cancel();

        let mut alive = self.players.iter_mut().filter(|p| p.is_alive);
        let winner = match (alive.next(), alive.next()) {
            (Some(winner), None) => {
                winner.wins += 1;
                Some(winner.name.clone())
            }
            _ => None,
        };

        info!(room = %self.code, winner = ?winner, "game over");
        self.push(
            Recipient::All,
            ServerMessage::GameOver {
                winner_name: winner,
                scoreboard: self.scoreboard(),
            },
        );
    }

    // =======================================================================
    // Views
    // =======================================================================

    pub fn roster(&self) -> Vec<PlayerView> {
        self.players
            .iter()
            .map(|p| PlayerView {
                id: p.id,
                name: p.name.clone(),
                lives: p.lives,
                is_alive: p.is_alive,
                wins: p.wins,
                peer_id: p.peer_id.clone(),
                is_host: p.id == self.host,
            })
            .collect()
    }

    fn scoreboard(&self) -> Vec<ScoreEntry> {
        self.players
            .iter()
            .map(|p| ScoreEntry {
                name: p.name.clone(),
                is_alive: p.is_alive,
                lives: p.lives,
                wins: p.wins,
                is_host: p.id == self.host,
            })
            .collect()
    }

    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            code: self.code.clone(),
            status: self.status,
            host: self.host,
            lives_per_player: self.lives_per_player,
            players: self.roster(),
            current_player: self.current_player_id(),
            prompt: self.prompt.clone(),
            used_words: self.used_words.len(),
            fuse_remaining: self.fuse.remaining(),
            turn: self.turn,
        }
    }

    fn broadcast_roster(&mut self) {
        let players = self.roster();
        self.push(Recipient::All, ServerMessage::PlayerListUpdate { players });
    }

    fn push(&mut self, to: Recipient, msg: ServerMessage) {
        self.outbox.push((to, msg));
    }

    /// Drains the events produced since the last call.
    pub fn take_outbox(&mut self) -> Vec<Outbound> {
        std::mem::take(&mut self.outbox)
    }

    // =======================================================================
    // Accessors
    // =======================================================================

    fn seat_of(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    pub fn status(&self) -> RoomStatus {
        self.status
    }

    pub fn host(&self) -> PlayerId {
        self.host
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub fn lives_per_player(&self) -> u32 {
        self.lives_per_player
    }

    /// Player whose turn it is; `None` outside a round.
    pub fn current_player_id(&self) -> Option<PlayerId> {
        if !self.status.is_playing() {
            return None;
        }
        self.players.get(self.current).map(|p| p.id)
    }

    pub fn is_used(&self, word: &str) -> bool {
        self.used_words.contains(word)
    }

    pub fn fuse(&self) -> &Fuse {
        &self.fuse
    }

    pub fn fuse_mut(&mut self) -> &mut Fuse {
        &mut self.fuse
    }
}
