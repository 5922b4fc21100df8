//! Wire protocol for wordfuse.
//!
//! This crate defines what browsers and the server say to each other:
//!
//! - **Identity** ([`PlayerId`], [`RoomCode`]): who is talking and about
//!   which room.
//! - **Messages** ([`ClientMessage`], [`ServerMessage`]): every request a
//!   client can make and every event a room can emit, as tagged enums.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how [`Envelope`]s are
//!   turned into bytes and back.
//!
//! The protocol layer knows nothing about sockets or rooms; it only shapes
//! and (de)serializes messages.
//!
//! ```text
//! Transport (bytes) → Protocol (Envelope<ClientMessage>) → Room actor
//! ```

mod codec;
mod error;
mod message;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use message::{ClientMessage, ErrorCode, ServerMessage};
pub use types::{Envelope, PlayerId, PlayerView, Recipient, RoomCode, ScoreEntry};

/// Version a client must announce in its `hello`.
pub const PROTOCOL_VERSION: u32 = 1;
