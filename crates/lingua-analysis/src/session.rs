use std::sync::Arc;

use lingua_core::{HandoffStore, WordIndexBuilder, selection};
use lingua_types::{CaptureSnapshot, WordId, WordList, WordsContainer};
use tokio::sync::watch;

use crate::orchestrator::{AnalysisOrchestrator, JobState};
use crate::state::{DetailsState, WordsState};

pub const NO_DATA_MESSAGE: &str = "Service provided no data";

/// Presentation-facing facade: owns the word list and forwards analysis
/// requests to the orchestrator.
#[derive(Clone)]
pub struct AnalysisSession {
    words: Arc<watch::Sender<WordsState>>,
    orchestrator: AnalysisOrchestrator,
}

impl AnalysisSession {
    pub fn new(orchestrator: AnalysisOrchestrator) -> Self {
        let (words, _rx) = watch::channel(WordsState {
            is_loading: true,
            ..WordsState::default()
        });
        Self {
            words: Arc::new(words),
            orchestrator,
        }
    }

    /// Read the handed-off capture and index it
    pub async fn load(
        &self,
        handoff: &HandoffStore<CaptureSnapshot>,
        builder: &WordIndexBuilder,
    ) -> bool {
        let Some(snapshot) = handoff.get().await else {
            tracing::warn!("[SESSION] No capture in handoff store");
            self.words.send_replace(WordsState {
                data: None,
                is_loading: false,
                error: Some(NO_DATA_MESSAGE.to_string()),
            });
            return false;
        };

        let words = builder.build(&snapshot).await;
        tracing::info!("[SESSION] Loaded {} words", words.len());

        self.words.send_replace(WordsState {
            data: Some(WordsContainer {
                background: Arc::new(snapshot.image().clone()),
                words,
            }),
            is_loading: false,
            error: None,
        });
        true
    }

    pub fn words(&self) -> watch::Receiver<WordsState> {
        self.words.subscribe()
    }

    pub fn details(&self) -> watch::Receiver<DetailsState> {
        self.orchestrator.details()
    }

    pub fn orchestrator(&self) -> &AnalysisOrchestrator {
        &self.orchestrator
    }

    /// Current word list, empty before a capture is loaded
    pub fn word_list(&self) -> WordList {
        self.words
            .borrow()
            .data
            .as_ref()
            .map(|container| container.words.clone())
            .unwrap_or_default()
    }

    pub fn select_word(&self, id: Option<WordId>) {
        self.words.send_modify(|state| {
            if let Some(container) = state.data.as_mut() {
                container.words = selection::select(&container.words, id);
            }
        });
    }

    /// Select the first word matching `text`, clearing the selection if none does
    pub fn select_text(&self, text: &str) -> Option<WordId> {
        let id = selection::find_by_text(&self.word_list(), text);
        self.select_word(id);
        id
    }

    pub fn request_analysis(&self) -> bool {
        self.orchestrator.start_analysis(&self.word_list())
    }

    pub fn stop_analysis(&self) -> JobState {
        self.orchestrator.stop_analysis()
    }

    /// Restart the current analysis with reasoning suppressed
    pub fn skip_thinking(&self) -> bool {
        self.orchestrator
            .restart_with_override(&self.word_list(), true)
    }
}
