use serde::{Deserialize, Serialize};

/// One piece of analysis about the selected word.
///
/// Records are values: an update is a new record carrying the accumulated text,
/// never an in-place patch of one already published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetailRecord {
    WordMeaning(WordMeaning),
    Explanation(Explanation),
    Formality(Formality),
}

/// Dictionary data for the selected word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordMeaning {
    pub word: String,
    pub phonetic: Option<String>,
}

/// Streamed model explanation, split into reasoning and answer text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    pub thinking_text: String,
    pub answer_text: String,
    pub elapsed_nanos: u64,
    pub is_thinking: bool,
}

impl Explanation {
    /// Fill a side this record left empty with the previous record's text.
    ///
    /// Both buffers only ever grow, so an empty side means "unchanged".
    pub fn carry_forward(mut self, previous: &Explanation) -> Explanation {
        if self.thinking_text.is_empty() {
            self.thinking_text = previous.thinking_text.clone();
        }
        if self.answer_text.is_empty() {
            self.answer_text = previous.answer_text.clone();
        }
        self
    }
}

/// Formality in [0, 1]. Not clamped here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Formality {
    pub score: f32,
}
