use std::time::Duration;

use lingua_dictionary::{DictionaryError, DictionaryService, WordEntry};
use lingua_llm::{ExplanationService, GenerateRequest, GenerateResponse, LineReader, LlmError};
use serde_json::json;
use tokio::io::{AsyncWriteExt, BufReader};

/// Offline dictionary that knows every word and no pronunciation
pub struct MockDictionary;

#[async_trait::async_trait]
impl DictionaryService for MockDictionary {
    async fn lookup(&self, word: &str) -> Result<WordEntry, DictionaryError> {
        Ok(WordEntry {
            word: word.to_lowercase(),
            phonetic: Some(format!("/{}/", word.to_lowercase())),
            phonetics: Vec::new(),
            origin: None,
            meanings: Vec::new(),
        })
    }
}

/// Offline model that streams a canned answer, one token per line
pub struct MockLlm {
    token_delay: Duration,
}

impl MockLlm {
    pub fn with_delay(token_delay: Duration) -> Self {
        Self { token_delay }
    }
}

impl Default for MockLlm {
    fn default() -> Self {
        Self {
            token_delay: Duration::from_millis(40),
        }
    }
}

fn canned_tokens(request: &GenerateRequest) -> Vec<String> {
    let mut tokens = Vec::new();
    if !request.prompt.starts_with(lingua_llm::prompt::NO_THINK) {
        tokens.extend(["<think>", "Looking", " at", " the", " context", "</think>"].map(String::from));
    }
    tokens.extend(
        "This is an offline answer. Start without --mock to ask a real model."
            .split_inclusive(' ')
            .map(String::from),
    );
    tokens
}

#[async_trait::async_trait]
impl ExplanationService for MockLlm {
    async fn generate_stream(
        &self,
        _endpoint: &str,
        request: &GenerateRequest,
    ) -> Result<LineReader, LlmError> {
        let (reader, mut writer) = tokio::io::duplex(1024);
        let tokens = canned_tokens(request);
        let model = request.model.clone();
        let delay = self.token_delay;

        tokio::spawn(async move {
            for token in tokens {
                let line = json!({"model": model, "created_at": "", "response": token, "done": false});
                if writer.write_all(format!("{line}\n").as_bytes()).await.is_err() {
                    tracing::debug!("[MOCK] Reader went away");
                    return;
                }
                tokio::time::sleep(delay).await;
            }
            let done = json!({"model": model, "created_at": "", "response": "", "done": true});
            let _ = writer.write_all(format!("{done}\n").as_bytes()).await;
        });

        Ok(Box::pin(BufReader::new(reader)))
    }

    async fn generate(
        &self,
        _endpoint: &str,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, LlmError> {
        Ok(GenerateResponse {
            model: request.model.clone(),
            created_at: String::new(),
            response: r#"{"formality": 0.5}"#.into(),
            done: true,
            total_duration: None,
            load_duration: None,
            prompt_eval_count: None,
            eval_count: None,
            eval_duration: None,
        })
    }
}
