//! Command-line and environment configuration for `wordfuse-server`.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use wordfuse_dictionary::{HttpDictionary, Lexicon, WordList};
use wordfuse_fuse::FuseConfig;
use wordfuse_room::RoomConfig;
use wordfuse_session::SessionConfig;

use crate::WordfuseError;

/// wordfuse server - multiplayer word-bomb game over WebSocket
#[derive(Parser, Debug, Clone)]
#[command(name = "wordfuse-server", version, about)]
pub struct ServerArgs {
    /// Address to listen on
    #[arg(short, long, env = "WORDFUSE_BIND", default_value = "0.0.0.0:8080")]
    pub bind: String,

    /// Base URL of a dictionaryapi.dev-compatible lookup service
    #[arg(long, env = "WORDFUSE_DICTIONARY_URL", default_value = HttpDictionary::DEFAULT_URL)]
    pub dictionary_url: String,

    /// Newline-separated word file; replaces the HTTP dictionary when set
    #[arg(long, env = "WORDFUSE_WORD_LIST")]
    pub word_list: Option<PathBuf>,

    /// Shortest bomb fuse, in seconds
    #[arg(long, env = "WORDFUSE_MIN_BOMB_SECS", default_value_t = 5)]
    pub min_bomb_secs: u64,

    /// Longest bomb fuse, in seconds
    #[arg(long, env = "WORDFUSE_MAX_BOMB_SECS", default_value_t = 40)]
    pub max_bomb_secs: u64,

    /// How long a dictionary lookup may take, in milliseconds
    #[arg(long, env = "WORDFUSE_LOOKUP_TIMEOUT_MS", default_value_t = 3000)]
    pub lookup_timeout_ms: u64,

    /// Seconds of client silence before a connection is dropped
    #[arg(long, env = "WORDFUSE_IDLE_TIMEOUT_SECS", default_value_t = 90)]
    pub idle_timeout_secs: u64,

    /// Maximum simultaneous connections
    #[arg(long, env = "WORDFUSE_MAX_SESSIONS", default_value_t = 1024)]
    pub max_sessions: usize,
}

impl ServerArgs {
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }

    pub fn room_config(&self) -> RoomConfig {
        RoomConfig {
            fuse: FuseConfig::new(self.min_bomb_secs, self.max_bomb_secs),
            lookup_timeout: self.lookup_timeout(),
            ..RoomConfig::default()
        }
        .validated()
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            max_sessions: self.max_sessions,
            idle_timeout: Duration::from_secs(self.idle_timeout_secs.max(1)),
        }
    }

    /// Loads the word file if one is configured, otherwise points at the
    /// HTTP dictionary.
    pub async fn lexicon(&self) -> Result<Lexicon, WordfuseError> {
        match &self.word_list {
            Some(path) => {
                let list = WordList::load(path).await?;
                tracing::info!(path = %path.display(), words = list.len(), "using word list");
                Ok(list.into())
            }
            None => {
                let http = HttpDictionary::new(&self.dictionary_url, self.lookup_timeout())?;
                tracing::info!(url = %http.base_url(), "using HTTP dictionary");
                Ok(http.into())
            }
        }
    }
}
