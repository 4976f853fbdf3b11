mod client;
mod types;

pub use client::OpenDictionaryClient;
pub use types::{Definition, Meaning, Phonetic, WordEntry};

/// Word lookup provider interface
#[async_trait::async_trait]
pub trait DictionaryService: Send + Sync {
    /// Look up the headword entry for a single word
    async fn lookup(&self, word: &str) -> Result<WordEntry, DictionaryError>;
}

/// Stand-in used when dictionary lookups are turned off in the config
pub struct DisabledDictionary;

#[async_trait::async_trait]
impl DictionaryService for DisabledDictionary {
    async fn lookup(&self, _word: &str) -> Result<WordEntry, DictionaryError> {
        Err(DictionaryError::Disabled)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("Word not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid dictionary URL: {0}")]
    InvalidUrl(String),

    #[error("Dictionary lookups disabled")]
    Disabled,
}
