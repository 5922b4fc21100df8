use std::io;

/// Socket-level failures. Any of them ends the connection concerned.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("could not bind listener: {0}")]
    Bind(#[source] io::Error),

    #[error("could not accept tcp connection: {0}")]
    Accept(#[source] io::Error),

    /// The peer connected but the WebSocket upgrade failed.
    #[error("websocket upgrade failed: {0}")]
    Upgrade(String),

    #[error("send failed: {0}")]
    Send(String),

    #[error("receive failed: {0}")]
    Receive(String),
}
