use std::env;

use serde::{Deserialize, Serialize};

fn default_endpoint_address() -> String {
    "127.0.0.1:11434".to_string()
}

fn default_model_name() -> String {
    "qwen3:32b".to_string()
}

fn default_suppress_reasoning() -> bool {
    true
}

fn default_target_language() -> String {
    "Russian".to_string()
}

/// Local LLM (Ollama) connection and prompting options
#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LlmConfig {
    /// host:port or full URL of the Ollama server
    #[serde(default = "default_endpoint_address")]
    pub endpoint_address: String,
    #[serde(default = "default_model_name")]
    pub model_name: String,
    /// Prefix prompts with `/no_think`
    #[serde(default = "default_suppress_reasoning")]
    pub suppress_reasoning: bool,
    /// Language the explanation is written in
    #[serde(default = "default_target_language")]
    pub target_language: String,
}

impl LlmConfig {
    pub fn new() -> Self {
        let endpoint_address = env::var("LLM_ENDPOINT").unwrap_or_else(|_| default_endpoint_address());
        let model_name = env::var("LLM_MODEL").unwrap_or_else(|_| default_model_name());

        Self {
            endpoint_address,
            model_name,
            ..Self::default()
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint_address: default_endpoint_address(),
            model_name: default_model_name(),
            suppress_reasoning: default_suppress_reasoning(),
            target_language: default_target_language(),
        }
    }
}
