use std::time::Duration;

use wordfuse_fuse::FuseConfig;

/// Per-room limits and timings.
#[derive(Debug, Clone)]
pub struct RoomConfig {
    /// Players needed to start or restart.
    pub min_players: usize,

    /// Seats in a room.
    pub max_players: usize,

    /// Lives used when a room is created without a setting.
    pub default_lives: u32,

    /// Upper bound for the lives setting; the lower bound is 1.
    pub max_lives: u32,

    /// Bomb fuse bounds.
    pub fuse: FuseConfig,

    /// Longest a dictionary lookup may take before the word is refused.
    pub lookup_timeout: Duration,

    /// Capacity of each room's command queue.
    pub channel_size: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            min_players: 2,
            max_players: 4,
            default_lives: 3,
            max_lives: 5,
            fuse: FuseConfig::default(),
            lookup_timeout: Duration::from_secs(3),
            channel_size: 64,
        }
    }
}

impl RoomConfig {
    /// Returns a copy with every field forced into a workable range.
    pub fn validated(mut self) -> Self {
        self.min_players = self.min_players.max(2);
        self.max_players = self.max_players.max(self.min_players);
        self.max_lives = self.max_lives.max(1);
        self.default_lives = self.default_lives.clamp(1, self.max_lives);
        self.fuse = self.fuse.validated();
        self.channel_size = self.channel_size.max(1);
        self
    }

    /// Resolves a requested lives setting. Missing means the default;
    /// anything else is clamped into `1..=max_lives`, never rejected.
    pub fn clamp_lives(&self, requested: Option<i64>) -> u32 {
        match requested {
            None => self.default_lives,
            Some(n) => n.clamp(1, i64::from(self.max_lives)) as u32,
        }
    }
}

/// Lifecycle of a room's game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomStatus {
    /// Gathering players; the only joinable status.
    Lobby,
    /// A round is running.
    Playing,
    /// A round ended; waiting for the host to restart.
    Over,
}

impl RoomStatus {
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Lobby)
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }

    /// `Lobby → Playing → Over → Playing ...`; a restart may also replace
    /// a running round.
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Lobby, Self::Playing)
                | (Self::Playing, Self::Over)
                | (Self::Playing, Self::Playing)
                | (Self::Over, Self::Playing)
        )
    }
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lobby => write!(f, "Lobby"),
            Self::Playing => write!(f, "Playing"),
            Self::Over => write!(f, "Over"),
        }
    }
}
