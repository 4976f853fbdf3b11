use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lingua_config::{Settings, SettingsOverrides, SettingsStore};
use lingua_core::selection;
use lingua_dictionary::DictionaryService;
use lingua_llm::{ExplanationService, StreamingResponseParser, prompt};
use lingua_types::{DetailRecord, IndexedWord, WordMeaning};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::AnalysisError;
use crate::state::{DetailsState, merge_detail};

/// Lifecycle of the job occupying the orchestrator's single slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Idle,
    Running,
    Cancelled,
    Completed,
    Failed(String),
}

/// Everything a job needs, frozen when it starts
struct JobRequest {
    word: String,
    context: Vec<String>,
    settings: Settings,
}

struct ActiveJob {
    id: Uuid,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
    state: JobState,
}

struct Shared {
    dictionary: Arc<dyn DictionaryService>,
    llm: Arc<dyn ExplanationService>,
    settings: SettingsStore,
    target_language: String,
    details: watch::Sender<DetailsState>,
    slot: Mutex<Option<ActiveJob>>,
}

impl Shared {
    fn slot(&self) -> MutexGuard<'_, Option<ActiveJob>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply a DetailsState mutation unless the job has been cancelled.
    ///
    /// The check runs under the watch lock, the same lock `stop` waits on.
    fn publish(&self, cancel: &CancellationToken, mutate: impl FnOnce(&mut DetailsState)) -> bool {
        self.details.send_if_modified(|state| {
            if cancel.is_cancelled() {
                return false;
            }
            mutate(state);
            true
        })
    }

    /// Record the job's final state and publish its last DetailsState change.
    ///
    /// Both happen under the slot lock, so a reader that sees loading end also
    /// sees the slot free for the next start.
    fn finish(
        &self,
        id: Uuid,
        cancel: &CancellationToken,
        state: JobState,
        mutate: impl FnOnce(&mut DetailsState),
    ) {
        let mut slot = self.slot();
        let Some(job) = slot.as_mut().filter(|job| job.id == id) else {
            return;
        };
        job.state = state;
        self.publish(cancel, mutate);
    }
}

/// Runs dictionary lookup, streamed explanation and formality scoring for the
/// selected word, one job at a time.
#[derive(Clone)]
pub struct AnalysisOrchestrator {
    shared: Arc<Shared>,
}

impl AnalysisOrchestrator {
    pub fn new(
        dictionary: Arc<dyn DictionaryService>,
        llm: Arc<dyn ExplanationService>,
        settings: SettingsStore,
        target_language: String,
    ) -> Self {
        let (details, _rx) = watch::channel(DetailsState::default());
        Self {
            shared: Arc::new(Shared {
                dictionary,
                llm,
                settings,
                target_language,
                details,
                slot: Mutex::new(None),
            }),
        }
    }

    pub fn details(&self) -> watch::Receiver<DetailsState> {
        self.shared.details.subscribe()
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.shared.settings
    }

    pub fn job_state(&self) -> JobState {
        self.shared
            .slot()
            .as_ref()
            .map_or(JobState::Idle, |job| job.state.clone())
    }

    /// Start analysing the selected word of `words`.
    ///
    /// Returns `false` without side effects when a job is already running or
    /// nothing is selected.
    pub fn start_analysis(&self, words: &[IndexedWord]) -> bool {
        let mut slot = self.shared.slot();

        if matches!(slot.as_ref().map(|job| &job.state), Some(JobState::Running)) {
            tracing::debug!("[ANALYSIS] Job already running, ignoring request");
            return false;
        }

        let Some(target) = selection::selected(words) else {
            tracing::debug!("[ANALYSIS] No word selected");
            return false;
        };

        let request = JobRequest {
            word: target.text.clone(),
            context: words.iter().map(|word| word.text.clone()).collect(),
            settings: self.shared.settings.effective(),
        };

        let id = Uuid::new_v4();
        let cancel = CancellationToken::new();
        tracing::info!(
            "[ANALYSIS] Job {} for '{}' ({} context words, model {})",
            id,
            request.word,
            request.context.len(),
            request.settings.model_name
        );

        self.shared
            .details
            .send_modify(|state| *state = state.next_job());

        let handle = tokio::spawn(run_job(
            self.shared.clone(),
            id,
            cancel.clone(),
            request,
        ));

        *slot = Some(ActiveJob {
            id,
            cancel,
            handle,
            state: JobState::Running,
        });

        true
    }

    /// Cancel the current job and free the slot.
    ///
    /// Once this returns no further DetailsState mutation from the stopped job
    /// is visible. Also clears any transient settings override. Returns the
    /// state the job was left in.
    pub fn stop_analysis(&self) -> JobState {
        let job = self.shared.slot().take();
        self.shared.settings.clear_override();

        let Some(job) = job else {
            return JobState::Idle;
        };

        job.cancel.cancel();
        job.handle.abort();
        // Also waits out a mutation that passed its cancellation check before we cancelled
        self.shared.details.send_if_modified(|state| {
            let was_loading = state.is_loading;
            state.is_loading = false;
            was_loading
        });

        match job.state {
            JobState::Running => {
                tracing::info!("[ANALYSIS] Job {} cancelled", job.id);
                JobState::Cancelled
            }
            finished => finished,
        }
    }

    /// Stop, apply the reasoning override, and start again on the same words
    pub fn restart_with_override(&self, words: &[IndexedWord], suppress_reasoning: bool) -> bool {
        self.stop_analysis();
        self.shared
            .settings
            .set_override(SettingsOverrides::suppress_reasoning(suppress_reasoning));
        self.start_analysis(words)
    }
}

async fn run_job(shared: Arc<Shared>, id: Uuid, cancel: CancellationToken, request: JobRequest) {
    let result = tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AnalysisError::Cancelled),
        result = pipeline(&shared, &cancel, &request) => result,
    };

    match result {
        Ok(()) => {
            tracing::info!("[ANALYSIS] Job {} completed", id);
            shared.finish(id, &cancel, JobState::Completed, |state| {
                state.is_loading = false
            });
        }
        Err(AnalysisError::Cancelled) => {
            tracing::info!("[ANALYSIS] Job {} observed cancellation", id);
            shared.finish(id, &cancel, JobState::Cancelled, |_| {});
        }
        Err(e) => {
            let message = e.to_string();
            tracing::error!("[ANALYSIS] Job {} failed: {}", id, message);
            shared.finish(id, &cancel, JobState::Failed(message.clone()), |state| {
                state.is_loading = false;
                state.error = Some(message);
            });
        }
    }
}

async fn pipeline(
    shared: &Shared,
    cancel: &CancellationToken,
    request: &JobRequest,
) -> Result<(), AnalysisError> {
    let settings = &request.settings;
    if settings.model_name.trim().is_empty() {
        return Err(AnalysisError::MissingModel);
    }

    // Dictionary lookup never fails the job
    let meaning = lookup_meaning(shared.dictionary.as_ref(), &request.word).await;
    shared.publish(cancel, |state| {
        merge_detail(&mut state.detail_data, DetailRecord::WordMeaning(meaning))
    });

    let explain = prompt::explanation_request(
        &settings.model_name,
        &request.word,
        &request.context,
        &shared.target_language,
        settings.suppress_reasoning,
    );
    let reader = shared
        .llm
        .generate_stream(&settings.endpoint_address, &explain)
        .await?;

    let mut parser = StreamingResponseParser::new(reader, cancel.clone());
    let mut chunks = 0usize;
    while let Some(record) = parser.next_record().await {
        let record = record?;
        chunks += 1;
        shared.publish(cancel, |state| {
            merge_detail(&mut state.detail_data, DetailRecord::Explanation(record))
        });
    }
    tracing::debug!("[ANALYSIS] Explanation drained after {} chunks", chunks);

    let formality_request = prompt::formality_request(
        &settings.model_name,
        &request.word,
        &request.context,
        settings.suppress_reasoning,
    );
    let response = shared
        .llm
        .generate(&settings.endpoint_address, &formality_request)
        .await?;
    let formality = response.to_formality()?;

    shared.publish(cancel, |state| {
        merge_detail(&mut state.detail_data, DetailRecord::Formality(formality))
    });

    Ok(())
}

async fn lookup_meaning(dictionary: &dyn DictionaryService, word: &str) -> WordMeaning {
    match dictionary.lookup(word).await {
        Ok(entry) => WordMeaning {
            phonetic: entry.best_phonetic(),
            word: entry.word,
        },
        Err(e) => {
            tracing::warn!("[DICT] Lookup for '{}' failed: {}", word, e);
            WordMeaning {
                word: word.to_string(),
                phonetic: None,
            }
        }
    }
}
