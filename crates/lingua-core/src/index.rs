use std::sync::Arc;

use lingua_types::{CaptureSnapshot, IndexedWord, RawFragment, WordId, WordList};

use crate::capture::TextRecognizer;

/// Turns a capture into an addressable word list.
///
/// With a recognizer the words come from the screenshot, otherwise from the
/// fragments the capture already carries. Recognition failures degrade to an
/// empty list; building never fails.
#[derive(Clone, Default)]
pub struct WordIndexBuilder {
    recognizer: Option<Arc<dyn TextRecognizer>>,
}

impl WordIndexBuilder {
    pub fn new() -> Self {
        Self { recognizer: None }
    }

    pub fn with_recognizer(recognizer: Arc<dyn TextRecognizer>) -> Self {
        Self {
            recognizer: Some(recognizer),
        }
    }

    pub async fn build(&self, snapshot: &CaptureSnapshot) -> WordList {
        let fragments = match &self.recognizer {
            Some(recognizer) => match recognizer.recognize(snapshot.image()).await {
                Ok(fragments) => fragments,
                Err(e) => {
                    tracing::warn!("[INDEX] Text recognition failed, no words: {:#}", e);
                    Vec::new()
                }
            },
            None => snapshot.raw_fragments().to_vec(),
        };

        let words = index_fragments(fragments);
        tracing::debug!("[INDEX] Indexed {} words", words.len());
        words
    }
}

/// Keep fragments with a box and non-blank text, numbering them from 0 in input order
pub fn index_fragments(fragments: impl IntoIterator<Item = RawFragment>) -> WordList {
    fragments
        .into_iter()
        .filter_map(|fragment| {
            let bbox = fragment.bbox?;
            (!fragment.text.trim().is_empty()).then_some((fragment.text, bbox))
        })
        .zip(0..)
        .map(|((text, bbox), id): ((String, _), WordId)| IndexedWord {
            id,
            text,
            bbox,
            selected: false,
        })
        .collect()
}
