use lingua_types::{DetailRecord, WordsContainer};

/// Captured words as seen by the presentation layer
#[derive(Debug, Clone, Default)]
pub struct WordsState {
    pub data: Option<WordsContainer>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Analysis results for the selected word
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailsState {
    /// Bumped every time a job starts
    pub generation: u64,
    pub detail_data: Vec<DetailRecord>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl DetailsState {
    pub fn loading() -> Self {
        Self {
            is_loading: true,
            ..Self::default()
        }
    }

    /// Fresh loading state for the job after this one
    pub fn next_job(&self) -> Self {
        Self {
            generation: self.generation.wrapping_add(1),
            ..Self::loading()
        }
    }

    pub fn explanation_count(&self) -> usize {
        self.detail_data
            .iter()
            .filter(|record| matches!(record, DetailRecord::Explanation(_)))
            .count()
    }
}

/// Add a record to the stream.
///
/// An Explanation replaces a trailing Explanation (carrying its text forward);
/// everything else is appended.
pub fn merge_detail(stream: &mut Vec<DetailRecord>, record: DetailRecord) {
    match record {
        DetailRecord::Explanation(next) => match stream.last_mut() {
            Some(DetailRecord::Explanation(previous)) => {
                *previous = next.carry_forward(previous);
            }
            Some(DetailRecord::WordMeaning(_)) | Some(DetailRecord::Formality(_)) | None => {
                stream.push(DetailRecord::Explanation(next));
            }
        },
        record @ (DetailRecord::WordMeaning(_) | DetailRecord::Formality(_)) => {
            stream.push(record);
        }
    }
}
