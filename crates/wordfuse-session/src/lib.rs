//! Connection session tracking for wordfuse.
//!
//! Identity is ephemeral: a player exists for as long as their connection
//! does, so there is no authentication and no reconnect. The
//! [`SessionManager`] only answers "who is connected, from where, and how
//! recently did we hear from them".

mod error;
mod manager;
mod session;

pub use error::SessionError;
pub use manager::SessionManager;
pub use session::{Session, SessionConfig};
