use std::collections::HashSet;
use std::path::Path;

use crate::{Dictionary, DictionaryError, normalize};

/// Fixed in-memory word set.
///
/// Used for offline play and tests. Lookups never fail.
#[derive(Debug, Clone, Default)]
pub struct WordList {
    words: HashSet<String>,
}

impl WordList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from any iterator of words, normalizing each.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::new();
        for word in words {
            list.insert(word.as_ref());
        }
        list
    }

    /// Reads one word per line. Blank lines and lines starting with `#`
    /// are skipped.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, DictionaryError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path).await?;
        let list = Self::from_words(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        );
        tracing::info!(path = %path.display(), words = list.len(), "word list loaded");
        Ok(list)
    }

    pub fn insert(&mut self, word: &str) -> bool {
        let word = normalize(word);
        if word.is_empty() {
            return false;
        }
        self.words.insert(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Dictionary for WordList {
    async fn contains(&self, word: &str) -> Result<bool, DictionaryError> {
        Ok(self.words.contains(word))
    }
}
