use wordfuse_protocol::PlayerId;

/// Errors from session bookkeeping.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session not found for player {0}")]
    NotFound(PlayerId),

    #[error("player {0} already has an active session")]
    AlreadyConnected(PlayerId),

    #[error("server is full ({0} sessions)")]
    CapacityReached(usize),
}
