use std::sync::Arc;

use tokio::sync::watch;

use crate::llm::LlmConfig;

/// Settings the analysis pipeline reads at the start of every job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub endpoint_address: String,
    pub model_name: String,
    pub suppress_reasoning: bool,
}

impl From<&LlmConfig> for Settings {
    fn from(config: &LlmConfig) -> Self {
        Self {
            endpoint_address: config.endpoint_address.clone(),
            model_name: config.model_name.clone(),
            suppress_reasoning: config.suppress_reasoning,
        }
    }
}

/// Per-request values that win over the persisted ones until cleared
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    pub suppress_reasoning: Option<bool>,
}

impl SettingsOverrides {
    pub fn suppress_reasoning(value: bool) -> Self {
        Self {
            suppress_reasoning: Some(value),
        }
    }

    fn apply(&self, base: &Settings) -> Settings {
        Settings {
            endpoint_address: base.endpoint_address.clone(),
            model_name: base.model_name.clone(),
            suppress_reasoning: self.suppress_reasoning.unwrap_or(base.suppress_reasoning),
        }
    }
}

#[derive(Debug, Clone)]
struct Layers {
    base: Settings,
    overrides: Option<SettingsOverrides>,
}

impl Layers {
    fn resolve(&self) -> Settings {
        match &self.overrides {
            Some(overrides) => overrides.apply(&self.base),
            None => self.base.clone(),
        }
    }
}

/// Two-layer settings: persisted base plus an optional transient override.
///
/// The effective value is recomputed from both layers on every read.
#[derive(Clone)]
pub struct SettingsStore {
    layers: Arc<watch::Sender<Layers>>,
}

impl SettingsStore {
    pub fn new(base: Settings) -> Self {
        let (tx, _rx) = watch::channel(Layers {
            base,
            overrides: None,
        });
        Self {
            layers: Arc::new(tx),
        }
    }

    pub fn effective(&self) -> Settings {
        self.layers.borrow().resolve()
    }

    pub fn base(&self) -> Settings {
        self.layers.borrow().base.clone()
    }

    pub fn overrides(&self) -> Option<SettingsOverrides> {
        self.layers.borrow().overrides
    }

    /// Read stream of effective settings
    pub fn subscribe(&self) -> EffectiveSettings {
        EffectiveSettings {
            rx: self.layers.subscribe(),
        }
    }

    pub fn set_override(&self, overrides: SettingsOverrides) {
        tracing::debug!("Settings override applied: {:?}", overrides);
        self.layers.send_modify(|layers| layers.overrides = Some(overrides));
    }

    pub fn clear_override(&self) {
        self.layers.send_if_modified(|layers| layers.overrides.take().is_some());
    }

    pub fn save_endpoint_address(&self, address: impl Into<String>) {
        let address = address.into();
        self.layers
            .send_modify(|layers| layers.base.endpoint_address = address);
    }

    pub fn save_model_name(&self, name: impl Into<String>) {
        let name = name.into();
        self.layers.send_modify(|layers| layers.base.model_name = name);
    }

    pub fn save_suppress_reasoning(&self, suppress: bool) {
        self.layers
            .send_modify(|layers| layers.base.suppress_reasoning = suppress);
    }
}

/// Receiver side of [`SettingsStore::subscribe`]
pub struct EffectiveSettings {
    rx: watch::Receiver<Layers>,
}

impl EffectiveSettings {
    pub fn current(&self) -> Settings {
        self.rx.borrow().resolve()
    }

    /// Wait for the next change and return the new effective value
    pub async fn changed(&mut self) -> Option<Settings> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().resolve())
    }
}
