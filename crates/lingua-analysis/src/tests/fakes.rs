use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use lingua_config::{Settings, SettingsStore};
use lingua_dictionary::{DictionaryError, DictionaryService, Phonetic, WordEntry};
use lingua_llm::{ExplanationService, GenerateRequest, GenerateResponse, LineReader, LlmError};
use lingua_types::{BoundingBox, IndexedWord, WordList};
use tokio::io::{BufReader, DuplexStream};
use tokio::sync::{Notify, watch};

use crate::{AnalysisOrchestrator, DetailsState};

pub struct FakeDictionary {
    entry: Option<WordEntry>,
    gate: Option<Notify>,
    entered: Notify,
}

impl FakeDictionary {
    fn with(entry: Option<WordEntry>, gate: Option<Notify>) -> Arc<Self> {
        Arc::new(Self {
            entry,
            gate,
            entered: Notify::new(),
        })
    }

    fn entry(word: &str, phonetic: &str) -> WordEntry {
        WordEntry {
            word: word.to_string(),
            phonetic: None,
            phonetics: vec![Phonetic {
                text: Some(phonetic.to_string()),
                audio: None,
            }],
            origin: None,
            meanings: Vec::new(),
        }
    }

    pub fn found(word: &str, phonetic: &str) -> Arc<Self> {
        Self::with(Some(Self::entry(word, phonetic)), None)
    }

    pub fn failing() -> Arc<Self> {
        Self::with(None, None)
    }

    /// Lookups block until `release` is called
    pub fn gated(word: &str, phonetic: &str) -> Arc<Self> {
        Self::with(Some(Self::entry(word, phonetic)), Some(Notify::new()))
    }

    pub async fn wait_entered(&self) {
        tokio::time::timeout(Duration::from_secs(2), self.entered.notified())
            .await
            .expect("lookup never started");
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }
}

#[async_trait::async_trait]
impl DictionaryService for FakeDictionary {
    async fn lookup(&self, word: &str) -> Result<WordEntry, DictionaryError> {
        self.entered.notify_one();
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.entry
            .clone()
            .ok_or_else(|| DictionaryError::NotFound(word.to_string()))
    }
}

pub enum StreamScript {
    /// Whole body available at once
    Body(String),
    /// Body written by the test through `FakeLlm::writer`
    Live,
}

pub struct FakeLlm {
    script: StreamScript,
    formality: Result<String, u16>,
    requests: Mutex<Vec<GenerateRequest>>,
    writers: Mutex<Vec<DuplexStream>>,
    opened: Notify,
}

impl FakeLlm {
    pub fn new(script: StreamScript, formality: &str) -> Arc<Self> {
        Arc::new(Self {
            script,
            formality: Ok(formality.to_string()),
            requests: Mutex::new(Vec::new()),
            writers: Mutex::new(Vec::new()),
            opened: Notify::new(),
        })
    }

    pub fn failing_formality(script: StreamScript, status: u16) -> Arc<Self> {
        Arc::new(Self {
            script,
            formality: Err(status),
            requests: Mutex::new(Vec::new()),
            writers: Mutex::new(Vec::new()),
            opened: Notify::new(),
        })
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Server half of the most recently opened live stream
    pub async fn writer(&self) -> DuplexStream {
        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                let notified = self.opened.notified();
                if let Some(writer) = self.writers.lock().unwrap().pop() {
                    return writer;
                }
                notified.await;
            }
        })
        .await
        .expect("stream never opened")
    }
}

#[async_trait::async_trait]
impl ExplanationService for FakeLlm {
    async fn generate_stream(
        &self,
        _endpoint: &str,
        request: &GenerateRequest,
    ) -> Result<LineReader, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.script {
            StreamScript::Body(body) => Ok(Box::pin(Cursor::new(body.clone().into_bytes()))),
            StreamScript::Live => {
                let (client, server) = tokio::io::duplex(4096);
                self.writers.lock().unwrap().push(server);
                self.opened.notify_waiters();
                Ok(Box::pin(BufReader::new(client)))
            }
        }
    }

    async fn generate(
        &self,
        _endpoint: &str,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.formality {
            Ok(response) => Ok(GenerateResponse {
                model: request.model.clone(),
                created_at: String::new(),
                response: response.clone(),
                done: true,
                total_duration: None,
                load_duration: None,
                prompt_eval_count: None,
                eval_count: None,
                eval_duration: None,
            }),
            Err(status) => Err(LlmError::ApiError {
                status: *status,
                message: "model failed".into(),
            }),
        }
    }
}

pub fn chunk(token: &str) -> String {
    format!(
        "{{\"model\":\"m\",\"created_at\":\"t\",\"response\":{},\"done\":false}}\n",
        quote(token)
    )
}

pub fn done_chunk() -> String {
    "{\"model\":\"m\",\"created_at\":\"t\",\"response\":\"\",\"done\":true,\"total_duration\":1000}\n"
        .to_string()
}

pub fn stream_body(tokens: &[&str]) -> String {
    let mut body: String = tokens.iter().map(|token| chunk(token)).collect();
    body.push_str(&done_chunk());
    body
}

fn quote(token: &str) -> String {
    let escaped = token
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n");
    format!("\"{escaped}\"")
}

pub fn settings(model: &str, suppress_reasoning: bool) -> SettingsStore {
    SettingsStore::new(Settings {
        endpoint_address: "127.0.0.1:11434".into(),
        model_name: model.into(),
        suppress_reasoning,
    })
}

pub fn orchestrator(
    dictionary: Arc<FakeDictionary>,
    llm: Arc<FakeLlm>,
    settings: SettingsStore,
) -> AnalysisOrchestrator {
    AnalysisOrchestrator::new(dictionary, llm, settings, "Russian".into())
}

pub fn words(texts: &[&str], selected: Option<usize>) -> WordList {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| IndexedWord {
            id: i as u32,
            text: text.to_string(),
            bbox: BoundingBox::new(i as i32 * 10, 0, i as i32 * 10 + 8, 8),
            selected: selected == Some(i),
        })
        .collect()
}

pub async fn wait_for(
    rx: &mut watch::Receiver<DetailsState>,
    mut predicate: impl FnMut(&DetailsState) -> bool,
) -> DetailsState {
    let state = tokio::time::timeout(Duration::from_secs(2), rx.wait_for(|s| predicate(s)))
        .await
        .expect("timed out waiting for details")
        .expect("details channel closed");
    state.clone()
}
