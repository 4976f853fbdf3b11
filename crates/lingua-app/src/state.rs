use std::path::PathBuf;
use std::sync::Arc;

use lingua_analysis::{AnalysisOrchestrator, AnalysisSession};
use lingua_config::{Config, Settings, SettingsStore};
use lingua_core::{HandoffStore, WordIndexBuilder};
use lingua_dictionary::{DictionaryService, DisabledDictionary, OpenDictionaryClient};
use lingua_llm::{ExplanationService, OllamaClient};
use lingua_types::CaptureSnapshot;
use tokio::sync::RwLock;

use crate::mock::{MockDictionary, MockLlm};

/// Where profile edits are written back to
pub struct ProfileLocation {
    pub dir: PathBuf,
    pub name: String,
}

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub settings: SettingsStore,
    pub session: AnalysisSession,
    pub handoff: Arc<HandoffStore<CaptureSnapshot>>,
    pub builder: WordIndexBuilder,
    pub profile: Option<ProfileLocation>,
}

impl AppState {
    pub fn new(config: Config, mock: bool) -> Self {
        let (dictionary, llm): (Arc<dyn DictionaryService>, Arc<dyn ExplanationService>) = if mock
        {
            tracing::info!("[APP] Using offline mock services");
            (Arc::new(MockDictionary), Arc::new(MockLlm::default()))
        } else {
            let dictionary: Arc<dyn DictionaryService> = if config.dictionary.enabled {
                Arc::new(OpenDictionaryClient::new(
                    config.dictionary.base_url.clone(),
                    config.dictionary.language.clone(),
                ))
            } else {
                tracing::warn!("[APP] Dictionary disabled, lookups will fall back to the bare word");
                Arc::new(DisabledDictionary)
            };
            (dictionary, Arc::new(OllamaClient::new()))
        };

        Self::with_services(config, dictionary, llm)
    }

    pub fn with_services(
        config: Config,
        dictionary: Arc<dyn DictionaryService>,
        llm: Arc<dyn ExplanationService>,
    ) -> Self {
        let settings = SettingsStore::new(Settings::from(&config.llm));
        let orchestrator = AnalysisOrchestrator::new(
            dictionary,
            llm,
            settings.clone(),
            config.llm.target_language.clone(),
        );

        Self {
            config: Arc::new(RwLock::new(config)),
            settings,
            session: AnalysisSession::new(orchestrator),
            handoff: Arc::new(HandoffStore::new()),
            builder: WordIndexBuilder::new(),
            profile: None,
        }
    }

    pub fn with_profile(mut self, dir: PathBuf, name: impl Into<String>) -> Self {
        self.profile = Some(ProfileLocation {
            dir,
            name: name.into(),
        });
        self
    }

    /// Copy the persisted settings layer into the config and write the profile
    pub async fn persist_settings(&self) -> anyhow::Result<()> {
        let base = self.settings.base();
        let snapshot = {
            let mut config = self.config.write().await;
            config.llm.endpoint_address = base.endpoint_address;
            config.llm.model_name = base.model_name;
            config.llm.suppress_reasoning = base.suppress_reasoning;
            config.clone()
        };

        if let Some(location) = &self.profile {
            crate::profile::save_user_profile(&location.dir, &location.name, &snapshot)?;
        }
        Ok(())
    }
}
