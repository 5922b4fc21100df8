use wordfuse_protocol::{ErrorCode, PlayerId, RoomCode};

/// Errors from room operations.
///
/// `Display` is the text shown to the requesting player.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    #[error("Room {0} not found.")]
    NotFound(RoomCode),

    #[error("Game already started.")]
    GameAlreadyStarted(RoomCode),

    #[error("Room is full (max {max} players).")]
    RoomFull { code: RoomCode, max: usize },

    #[error("At least {needed} players are needed to start the game.")]
    InsufficientPlayers { needed: usize, have: usize },

    #[error("Only the host can {action} the game.")]
    NotAuthorized {
        player: PlayerId,
        action: &'static str,
    },

    #[error("Player {0} is not in this room.")]
    NotInRoom(PlayerId),

    #[error("Player {0} is already in room {1}.")]
    AlreadyInRoom(PlayerId, RoomCode),

    /// The room's actor is gone.
    #[error("Room {0} is unavailable.")]
    Unavailable(RoomCode),
}

/// Coarse classification of what went wrong.
///
/// None of these is fatal to anything but the request that caused it.
/// Refused words are not errors; they travel as `wordInvalid` events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// The requester lacks host rights.
    Authorization,
    /// No seat left.
    Capacity,
    /// The room does not exist or is in the wrong status.
    Lifecycle,
}

impl RoomError {
    pub fn fault(&self) -> Fault {
        match self {
            RoomError::NotAuthorized { .. } => Fault::Authorization,
            RoomError::RoomFull { .. } => Fault::Capacity,
            RoomError::NotFound(_)
            | RoomError::GameAlreadyStarted(_)
            | RoomError::InsufficientPlayers { .. }
            | RoomError::NotInRoom(_)
            | RoomError::AlreadyInRoom(..)
            | RoomError::Unavailable(_) => Fault::Lifecycle,
        }
    }

    /// Wire code sent alongside the message.
    pub fn code(&self) -> ErrorCode {
        match self {
            RoomError::NotFound(_) => ErrorCode::RoomNotFound,
            RoomError::GameAlreadyStarted(_) => ErrorCode::GameAlreadyStarted,
            RoomError::RoomFull { .. } => ErrorCode::RoomFull,
            RoomError::InsufficientPlayers { .. } => ErrorCode::InsufficientPlayers,
            RoomError::NotAuthorized { .. } => ErrorCode::NotAuthorized,
            RoomError::NotInRoom(_) => ErrorCode::NotInRoom,
            RoomError::AlreadyInRoom(..) => ErrorCode::AlreadyInRoom,
            RoomError::Unavailable(_) => ErrorCode::Unavailable,
        }
    }
}
