use std::env;

use serde::{Deserialize, Serialize};

use self::dictionary::DictionaryConfig;
use self::llm::LlmConfig;

pub mod dictionary;
pub mod llm;
pub mod settings;

pub use settings::{EffectiveSettings, Settings, SettingsOverrides, SettingsStore};

fn default_event_channel_capacity() -> usize {
    64
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub llm: LlmConfig,
    pub dictionary: DictionaryConfig,
    /// Capacity of the command channel between input and event loop
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl Config {
    pub fn new() -> Self {
        let event_channel_capacity = env::var("EVENT_CHANNEL_CAPACITY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_event_channel_capacity);

        Config {
            llm: LlmConfig::new(),
            dictionary: DictionaryConfig::new(),
            event_channel_capacity,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            dictionary: DictionaryConfig::default(),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}
