/// Failures looking a word up.
///
/// A word that simply does not exist is `Ok(false)`, not an error.
#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("invalid dictionary url: {0}")]
    InvalidUrl(String),

    #[error("dictionary request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("dictionary answered http {0}")]
    Status(u16),

    #[error("dictionary lookup timed out")]
    Timeout,

    #[error("failed to read word list: {0}")]
    Io(#[from] std::io::Error),
}
