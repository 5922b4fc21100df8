use std::fmt;

use serde::{Deserialize, Serialize};
use wordfuse_transport::ConnectionId;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Identifies a player for the lifetime of one connection.
///
/// Derived from the transport's [`ConnectionId`]; a reconnect is a new
/// player. Serializes as a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl From<ConnectionId> for PlayerId {
    fn from(id: ConnectionId) -> Self {
        Self(id.as_u64())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// Short, human-typable room identifier.
///
/// Always stored trimmed and uppercased, whichever way it was built, so
/// `"ab12cd "` and `"AB12CD"` name the same room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct RoomCode(String);

impl RoomCode {
    /// Normalizes raw user input into a code.
    pub fn parse(raw: &str) -> Self {
        Self(raw.trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when normalization left nothing.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for RoomCode {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<RoomCode> for String {
    fn from(code: RoomCode) -> Self {
        code.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Delivery
// ---------------------------------------------------------------------------

/// Who receives an outbound event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// Every player seated in the room.
    All,
    /// A single player.
    Player(PlayerId),
}

impl Recipient {
    /// Whether `player` is addressed.
    pub fn includes(&self, player: PlayerId) -> bool {
        match *self {
            Recipient::All => true,
            Recipient::Player(p) => p == player,
        }
    }
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// One row of a room's roster as clients see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub lives: u32,
    pub is_alive: bool,
    pub wins: u32,
    /// Opaque address for the voice/chat relay; never interpreted here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer_id: Option<String>,
    pub is_host: bool,
}

/// One line of the end-of-game scoreboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    pub name: String,
    pub is_alive: bool,
    pub lives: u32,
    pub wins: u32,
    pub is_host: bool,
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Frame wrapper carried in both directions.
///
/// `seq` is per-connection and per-direction; `timestamp` is milliseconds
/// since the sender's connection started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<M> {
    pub seq: u64,
    pub timestamp: u64,
    pub payload: M,
}

impl<M> Envelope<M> {
    pub fn new(seq: u64, timestamp: u64, payload: M) -> Self {
        Self {
            seq,
            timestamp,
            payload,
        }
    }
}
