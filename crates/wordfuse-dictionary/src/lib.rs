//! Word validation for wordfuse.
//!
//! Two halves:
//!
//! - [`Dictionary`]: "is this an English word?", answered asynchronously.
//!   [`HttpDictionary`] asks a dictionaryapi.dev-compatible service,
//!   [`WordList`] checks an in-memory set, and [`Lexicon`] picks one at
//!   runtime.
//! - [`precheck`] / [`confirm`]: the short-circuiting rule pipeline a
//!   submission runs through. The cheap, synchronous rules run first so a
//!   room can reject obvious misses without touching the network.

#![allow(async_fn_in_trait)]

mod error;
mod http;
mod validate;
mod wordlist;

pub use error::DictionaryError;
pub use http::HttpDictionary;
pub use validate::{Rejection, confirm, normalize, precheck};
pub use wordlist::WordList;

use std::future::Future;

/// Answers whether a word exists.
///
/// Implementations receive words already normalized (trimmed, lowercase).
/// The returned future must be `Send` because rooms run lookups on spawned
/// tasks.
pub trait Dictionary: Send + Sync + 'static {
    fn contains(&self, word: &str) -> impl Future<Output = Result<bool, DictionaryError>> + Send;
}

/// Dictionary chosen at startup.
pub enum Lexicon {
    Http(HttpDictionary),
    WordList(WordList),
}

impl Dictionary for Lexicon {
    async fn contains(&self, word: &str) -> Result<bool, DictionaryError> {
        match self {
            Lexicon::Http(http) => http.contains(word).await,
            Lexicon::WordList(list) => list.contains(word).await,
        }
    }
}

impl From<HttpDictionary> for Lexicon {
    fn from(dict: HttpDictionary) -> Self {
        Lexicon::Http(dict)
    }
}

impl From<WordList> for Lexicon {
    fn from(list: WordList) -> Self {
        Lexicon::WordList(list)
    }
}
