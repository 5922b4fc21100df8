//! # wordfuse
//!
//! Server for a real-time multiplayer word game: players in a room take
//! turns typing a word that contains a two-letter prompt before a bomb
//! goes off. Last player standing wins.
//!
//! This crate ties the layers together:
//!
//! ```text
//! wordfuse-transport  WebSocket connections
//! wordfuse-protocol   Envelope<ClientMessage> / Envelope<ServerMessage>
//! wordfuse-session    who is connected, and since when
//! wordfuse-room       room actors: turns, fuse, validation, events
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wordfuse::prelude::*;
//!
//! # async fn run() -> Result<(), WordfuseError> {
//! let server = WordfuseServerBuilder::new()
//!     .bind("0.0.0.0:8080")
//!     .build(WordList::from_words(["barn", "table"]))
//!     .await?;
//! server.run().await
//! # }
//! ```

mod config;
mod error;
mod handler;
mod server;

pub use config::ServerArgs;
pub use error::WordfuseError;
pub use server::{WordfuseServer, WordfuseServerBuilder};

pub mod prelude {
    pub use crate::{ServerArgs, WordfuseError, WordfuseServer, WordfuseServerBuilder};
    pub use wordfuse_dictionary::{Dictionary, HttpDictionary, Lexicon, WordList};
    pub use wordfuse_fuse::FuseConfig;
    pub use wordfuse_protocol::{
        ClientMessage, Envelope, ErrorCode, PROTOCOL_VERSION, PlayerId, PlayerView, RoomCode,
        ScoreEntry, ServerMessage,
    };
    pub use wordfuse_room::RoomConfig;
    pub use wordfuse_session::SessionConfig;
}
