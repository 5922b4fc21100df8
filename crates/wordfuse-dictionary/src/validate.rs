//! The submission rule pipeline.
//!
//! ```text
//! normalize → not the prompt → contains the prompt → unused → in dictionary
//! ```
//!
//! Each stage short-circuits with a [`Rejection`]. Rooms run [`precheck`]
//! inline and [`confirm`] on a spawned task, since only the last stage can
//! block.

use std::collections::HashSet;
use std::time::Duration;

use crate::Dictionary;

/// Why a submission was refused.
///
/// `Display` is the text shown to the submitting player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("Word cannot be exactly the prompt.")]
    MatchesPrompt,

    #[error("Word does not contain the prompt.")]
    MissingPrompt,

    #[error("Word already used this round.")]
    AlreadyUsed,

    #[error("Not a valid English word.")]
    UnknownWord,

    /// The dictionary errored or timed out.
    #[error("Dictionary API error.")]
    LookupFailed,
}

/// Trims and lowercases a submission.
pub fn normalize(word: &str) -> String {
    word.trim().to_lowercase()
}

/// Runs the synchronous rules. Returns the normalized word on success.
pub fn precheck(word: &str, prompt: &str, used: &HashSet<String>) -> Result<String, Rejection> {
    let word = normalize(word);
    let prompt = normalize(prompt);

    if word == prompt {
        return Err(Rejection::MatchesPrompt);
    }
    if !word.contains(&prompt) {
        return Err(Rejection::MissingPrompt);
    }
    if used.contains(&word) {
        return Err(Rejection::AlreadyUsed);
    }
    Ok(word)
}

/// Asks the dictionary about an already normalized word, giving up after
/// `timeout`.
pub async fn confirm<D>(dict: &D, word: &str, timeout: Duration) -> Result<(), Rejection>
where
    D: Dictionary + ?Sized,
{
    match tokio::time::timeout(timeout, dict.contains(word)).await {
        Ok(Ok(true)) => Ok(()),
        Ok(Ok(false)) => Err(Rejection::UnknownWord),
        Ok(Err(e)) => {
            tracing::warn!(word, error = %e, "dictionary lookup failed");
            Err(Rejection::LookupFailed)
        }
        Err(_) => {
            tracing::warn!(word, timeout_ms = timeout.as_millis() as u64, "dictionary lookup timed out");
            Err(Rejection::LookupFailed)
        }
    }
}
