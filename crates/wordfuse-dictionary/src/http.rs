use std::time::Duration;

use reqwest::{StatusCode, Url};

use crate::{Dictionary, DictionaryError};

/// Looks words up on a dictionaryapi.dev-compatible service.
///
/// `GET {base}/{word}` answers 404 for unknown words and a JSON array of
/// entries for known ones.
#[derive(Debug, Clone)]
pub struct HttpDictionary {
    client: reqwest::Client,
    base: Url,
}

impl HttpDictionary {
    /// Free English dictionary endpoint.
    pub const DEFAULT_URL: &'static str = "https://api.dictionaryapi.dev/api/v2/entries/en";

    /// Builds a client for `base_url` whose requests give up after
    /// `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DictionaryError> {
        let base = Url::parse(base_url).map_err(|e| DictionaryError::InvalidUrl(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(DictionaryError::InvalidUrl(base_url.to_string()));
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `{base}/{word}` with the word percent-encoded as one path segment,
    /// so input like `ar?x` cannot turn into a lookup of `ar`.
    fn entry_url(&self, word: &str) -> Result<Url, DictionaryError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| DictionaryError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .push(word);
        Ok(url)
    }
}

impl Dictionary for HttpDictionary {
    async fn contains(&self, word: &str) -> Result<bool, DictionaryError> {
        let url = self.entry_url(word)?;
        let resp = self.client.get(url).send().await?;
        let status = resp.status();

        if status == StatusCode::NOT_FOUND {
            tracing::debug!(word, "dictionary: no entry");
            return Ok(false);
        }
        if !status.is_success() {
            return Err(DictionaryError::Status(status.as_u16()));
        }

        let body = resp.text().await?;
        let found = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| {
                v.as_array()?
                    .first()?
                    .get("word")?
                    .as_str()
                    .map(|w| !w.is_empty())
            })
            .unwrap_or(false);

        tracing::debug!(word, found, "dictionary: lookup done");
        Ok(found)
    }
}
