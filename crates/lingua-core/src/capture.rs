use lingua_types::{CaptureImage, CaptureSnapshot, RawFragment};

use crate::handoff::HandoffStore;

/// Platform screen + text capture
#[async_trait::async_trait]
pub trait ScreenCapture: Send + Sync {
    /// Take one snapshot of the screen and its visible text
    async fn capture_once(&self) -> Result<CaptureSnapshot, CaptureError>;
}

/// Optical text recognition over a captured image
#[async_trait::async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(&self, image: &CaptureImage) -> anyhow::Result<Vec<RawFragment>>;
}

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Screen access denied: {0}")]
    AccessDenied(String),

    #[error("Capture source unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid capture data: {0}")]
    InvalidData(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Capture once and publish the snapshot for the analysis side
pub async fn capture_and_handoff(
    capture: &dyn ScreenCapture,
    handoff: &HandoffStore<CaptureSnapshot>,
) -> Result<(), CaptureError> {
    let snapshot = capture.capture_once().await?;
    tracing::info!(
        "[CAPTURE] {} fragments, image {}x{}",
        snapshot.raw_fragments().len(),
        snapshot.image().width,
        snapshot.image().height
    );
    handoff.set(snapshot).await;
    Ok(())
}
