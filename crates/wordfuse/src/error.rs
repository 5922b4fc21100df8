//! Top-level error for the server.

use wordfuse_dictionary::DictionaryError;
use wordfuse_protocol::ProtocolError;
use wordfuse_room::RoomError;
use wordfuse_session::SessionError;
use wordfuse_transport::TransportError;

/// Wraps every crate's error so handlers and `main` can use `?` freely.
#[derive(Debug, thiserror::Error)]
pub enum WordfuseError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Room(#[from] RoomError),

    /// Building the dictionary at startup failed.
    #[error(transparent)]
    Dictionary(#[from] DictionaryError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
