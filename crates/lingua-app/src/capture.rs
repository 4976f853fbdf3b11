use std::io::ErrorKind;
use std::path::PathBuf;

use lingua_core::{CaptureError, ScreenCapture};
use lingua_types::{CaptureImage, CaptureSnapshot, RawFragment};
use serde::Deserialize;

/// On-disk capture: image size plus the text fragments read from it
#[derive(Debug, Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
    #[serde(default)]
    fragments: Vec<RawFragment>,
}

/// Replays a capture saved as JSON in place of a live screen grab
pub struct FileCapture {
    path: PathBuf,
}

impl FileCapture {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl ScreenCapture for FileCapture {
    async fn capture_once(&self) -> Result<CaptureSnapshot, CaptureError> {
        let data = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::PermissionDenied => {
                    CaptureError::AccessDenied(format!("{}: {e}", self.path.display()))
                }
                ErrorKind::NotFound => {
                    CaptureError::Unavailable(format!("{}: {e}", self.path.display()))
                }
                _ => CaptureError::IoError(e),
            })?;

        let file: SnapshotFile =
            serde_json::from_str(&data).map_err(|e| CaptureError::InvalidData(e.to_string()))?;

        Ok(CaptureSnapshot::new(
            CaptureImage {
                width: file.width,
                height: file.height,
                data: Vec::new(),
            },
            file.fragments,
        ))
    }
}
