pub mod capture;
pub mod handoff;
pub mod index;
pub mod selection;

pub use capture::{CaptureError, ScreenCapture, TextRecognizer, capture_and_handoff};
pub use handoff::HandoffStore;
pub use index::{WordIndexBuilder, index_fragments};
