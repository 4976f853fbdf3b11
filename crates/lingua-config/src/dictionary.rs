use std::env;

use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

fn default_base_url() -> String {
    "https://api.dictionaryapi.dev/api/v2/entries/".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DictionaryConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Source language path segment of the dictionary API
    #[serde(default = "default_language")]
    pub language: String,
}

impl DictionaryConfig {
    pub fn new() -> Self {
        let base_url = env::var("DICTIONARY_URL").unwrap_or_else(|_| default_base_url());

        Self {
            base_url,
            ..Self::default()
        }
    }
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            base_url: default_base_url(),
            language: default_language(),
        }
    }
}
