use reqwest::{StatusCode, Url};

use crate::types::WordEntry;
use crate::{DictionaryError, DictionaryService};

/// Client for the Free Dictionary API (`GET {base}{language}/{word}`)
#[derive(Clone)]
pub struct OpenDictionaryClient {
    base_url: String,
    language: String,
    client: reqwest::Client,
}

impl OpenDictionaryClient {
    pub fn new(base_url: String, language: String) -> Self {
        Self {
            base_url,
            language,
            client: reqwest::Client::new(),
        }
    }

    fn entry_url(&self, word: &str) -> Result<Url, DictionaryError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| DictionaryError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| DictionaryError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .push(&self.language)
            .push(word);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl DictionaryService for OpenDictionaryClient {
    async fn lookup(&self, word: &str) -> Result<WordEntry, DictionaryError> {
        let url = self.entry_url(word)?;
        tracing::debug!("[DICT] GET {}", url);

        let response = self.client.get(url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(DictionaryError::NotFound(word.to_string()));
        }

        if !response.status().is_success() {
            return Err(DictionaryError::ApiError(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let entries: Vec<WordEntry> = response
            .json()
            .await
            .map_err(|e| DictionaryError::ApiError(format!("Failed to parse response: {}", e)))?;

        entries
            .into_iter()
            .next()
            .ok_or_else(|| DictionaryError::NotFound(word.to_string()))
    }
}
