//! Request and event payloads.
//!
//! Both enums are internally tagged: the variant name travels as a
//! camelCase `"type"` field next to the variant's own camelCase fields.
//!
//! ```json
//! { "type": "submitWord", "roomCode": "A1B2C3", "word": "table" }
//! { "type": "bombExploded", "playerId": 7, "remainingLives": 1 }
//! ```

use serde::{Deserialize, Deserializer, Serialize};

use crate::{PlayerId, PlayerView, RoomCode, ScoreEntry};

/// Stable, machine-readable reason attached to `gameError` and
/// `requestFailed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    RoomNotFound,
    GameAlreadyStarted,
    RoomFull,
    InsufficientPlayers,
    NotAuthorized,
    NotInRoom,
    AlreadyInRoom,
    Unavailable,
}

// ---------------------------------------------------------------------------
// Client → server
// ---------------------------------------------------------------------------

/// Everything a client may send.
///
/// `lives` is read leniently (see [`lenient_lives`]) so out-of-range or
/// oddly typed values get clamped by the room instead of failing the
/// whole frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// Must be the first frame on a connection.
    Hello { version: u32 },

    CreateRoom {
        #[serde(default)]
        host_name: String,
        #[serde(default, deserialize_with = "lenient_lives")]
        lives: Option<i64>,
        #[serde(default)]
        peer_id: Option<String>,
    },

    JoinRoom {
        room_code: RoomCode,
        #[serde(default)]
        player_name: String,
        #[serde(default)]
        peer_id: Option<String>,
    },

    StartGame { room_code: RoomCode },

    SubmitWord { room_code: RoomCode, word: String },

    GetPlayerList { room_code: RoomCode },

    RestartGame {
        room_code: RoomCode,
        #[serde(default, deserialize_with = "lenient_lives")]
        lives: Option<i64>,
    },

    LeaveRoom { room_code: RoomCode },

    Heartbeat { client_time: u64 },

    Disconnect {
        #[serde(default)]
        reason: String,
    },
}

/// Any JSON shape a client might put in `lives`.
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

impl LooseNumber {
    fn to_i64(&self) -> Option<i64> {
        match self {
            LooseNumber::Int(n) => Some(*n),
            LooseNumber::Uint(n) => Some(i64::try_from(*n).unwrap_or(i64::MAX)),
            LooseNumber::Float(f) => float_to_i64(*f),
            LooseNumber::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(float_to_i64))
            }
            LooseNumber::Other(_) => None,
        }
    }
}

/// Truncates toward zero, saturating at the `i64` bounds.
fn float_to_i64(f: f64) -> Option<i64> {
    f.is_finite().then(|| f.trunc() as i64)
}

/// Integers saturate, floats truncate, numeric strings are parsed.
/// Anything else reads as absent.
fn lenient_lives<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<LooseNumber>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(LooseNumber::to_i64))
}

// ---------------------------------------------------------------------------
// Server → client
// ---------------------------------------------------------------------------

/// Everything the server may send.
///
/// The first block answers the sender of a request; the rest are room
/// events fanned out by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    Welcome { player_id: PlayerId, server_time: u64 },

    HeartbeatAck { client_time: u64, server_time: u64 },

    RoomCreated { room_code: RoomCode },

    RoomJoined { room_code: RoomCode },

    /// A create/join request was refused.
    RequestFailed { code: ErrorCode, message: String },

    // -- room events --
    PlayerListUpdate { players: Vec<PlayerView> },

    GameStarted { prompt: String, current_player_id: PlayerId },

    TurnStarted {
        current_player_id: PlayerId,
        prompt: String,
        /// Fuse length in whole seconds.
        bomb_time: u64,
    },

    WordAccepted { player_id: PlayerId, word: String },

    /// Sent to the submitter only.
    WordInvalid { reason: String },

    NextTurn { current_player_id: PlayerId, prompt: String },

    BombExploded { player_id: PlayerId, remaining_lives: u32 },

    PlayerEliminated { player_id: PlayerId },

    GameOver {
        /// `None` when nobody survived the round.
        winner_name: Option<String>,
        scoreboard: Vec<ScoreEntry>,
    },

    GameRestarted {
        lives_per_player: u32,
        prompt: String,
        current_player_id: PlayerId,
        players: Vec<PlayerView>,
    },

    /// A start/restart request was refused.
    GameError { code: ErrorCode, message: String },

    /// Protocol-level failure during the handshake or session setup.
    /// Undecodable frames after `welcome` are dropped without a reply.
    Error { code: u16, message: String },
}

impl ServerMessage {
    /// The wire `"type"` tag, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ServerMessage::Welcome { .. } => "welcome",
            ServerMessage::HeartbeatAck { .. } => "heartbeatAck",
            ServerMessage::RoomCreated { .. } => "roomCreated",
            ServerMessage::RoomJoined { .. } => "roomJoined",
            ServerMessage::RequestFailed { .. } => "requestFailed",
            ServerMessage::PlayerListUpdate { .. } => "playerListUpdate",
            ServerMessage::GameStarted { .. } => "gameStarted",
            ServerMessage::TurnStarted { .. } => "turnStarted",
            ServerMessage::WordAccepted { .. } => "wordAccepted",
            ServerMessage::WordInvalid { .. } => "wordInvalid",
            ServerMessage::NextTurn { .. } => "nextTurn",
            ServerMessage::BombExploded { .. } => "bombExploded",
            ServerMessage::PlayerEliminated { .. } => "playerEliminated",
            ServerMessage::GameOver { .. } => "gameOver",
            ServerMessage::GameRestarted { .. } => "gameRestarted",
            ServerMessage::GameError { .. } => "gameError",
            ServerMessage::Error { .. } => "error",
        }
    }
}
