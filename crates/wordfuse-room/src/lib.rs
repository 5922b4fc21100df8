//! Rooms for wordfuse.
//!
//! - [`Game`]: the turn/bomb state machine of one room, free of I/O.
//! - [`RoomHandle`]: address of the tokio task that owns a `Game`,
//!   its fuse, and the outbound channels of its players.
//! - [`RoomManager`]: creates rooms, routes requests to them, and tears
//!   them down when they empty.
//!
//! Rooms share nothing; a fault in one never reaches another.

mod config;
mod dispatch;
mod error;
mod game;
mod manager;
mod prompt;
mod room;

pub use config::{RoomConfig, RoomStatus};
pub use dispatch::PlayerSender;
pub use error::{Fault, RoomError};
pub use game::{Game, Outbound, PendingLookup, Player, RoomSnapshot};
pub use manager::RoomManager;
pub use prompt::{PROMPTS, draw_prompt};
pub use room::RoomHandle;
