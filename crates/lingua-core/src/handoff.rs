use std::sync::Arc;

use tokio::sync::RwLock;

/// Single-slot store bridging the capture side and the analysis side.
///
/// `set` overwrites unconditionally; `get` does not consume the value.
pub struct HandoffStore<T> {
    slot: RwLock<Option<Arc<T>>>,
}

impl<T> HandoffStore<T> {
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    pub async fn set(&self, value: T) {
        let mut slot = self.slot.write().await;
        if slot.is_some() {
            tracing::debug!("[HANDOFF] Replacing unread value");
        }
        *slot = Some(Arc::new(value));
    }

    pub async fn get(&self) -> Option<Arc<T>> {
        self.slot.read().await.clone()
    }
}

impl<T> Default for HandoffStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
