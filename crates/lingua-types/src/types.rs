use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Identifier of a word within one capture. Never reused across rebuilds.
pub type WordId = u32;

/// Ordered words in recognition order (not spatial order)
pub type WordList = Vec<IndexedWord>;

/// Commands flowing from the input side into the app's event loop
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    SelectWord(Option<WordId>),
    SelectText(String),
    RequestAnalysis,
    StopAnalysis,
    SkipThinking,
    ShowWords,
    SaveModelName(String),
    SaveEndpointAddress(String),
    SaveSuppressReasoning(bool),
    Shutdown,
}

/// Axis-aligned rectangle in source-image pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl BoundingBox {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Half-open hit test: the right and bottom edges are outside.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }
}

/// A recognized piece of text before filtering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFragment {
    pub text: String,
    #[serde(default)]
    pub bbox: Option<BoundingBox>,
}

impl RawFragment {
    pub fn new(text: impl Into<String>, bbox: Option<BoundingBox>) -> Self {
        Self {
            text: text.into(),
            bbox,
        }
    }
}

/// Opaque screen bitmap, RGBA rows as captured
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// One capture event's output. Immutable after creation.
#[derive(Debug, Clone)]
pub struct CaptureSnapshot {
    image: CaptureImage,
    raw_fragments: Vec<RawFragment>,
}

impl CaptureSnapshot {
    pub fn new(image: CaptureImage, raw_fragments: Vec<RawFragment>) -> Self {
        Self {
            image,
            raw_fragments,
        }
    }

    pub fn image(&self) -> &CaptureImage {
        &self.image
    }

    pub fn raw_fragments(&self) -> &[RawFragment] {
        &self.raw_fragments
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedWord {
    pub id: WordId,
    pub text: String,
    pub bbox: BoundingBox,
    #[serde(default)]
    pub selected: bool,
}

/// Words visible on screen together with the screenshot they were read from
#[derive(Debug, Clone)]
pub struct WordsContainer {
    pub background: Arc<CaptureImage>,
    pub words: WordList,
}
