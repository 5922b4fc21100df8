/// Errors from encoding or decoding wire messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// A value could not be serialized.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Incoming bytes were not a valid message.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The message decoded but is not acceptable here (wrong order,
    /// wrong version, closed before it arrived).
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
