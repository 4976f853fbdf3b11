//! Single-word selection over a word list.
//!
//! These are pure projections: the list itself is the only state.

use lingua_types::{IndexedWord, WordId, WordList};

/// Mark exactly the word with `target` id as selected.
///
/// `None` or an unknown id clears the selection.
pub fn select(words: &[IndexedWord], target: Option<WordId>) -> WordList {
    words
        .iter()
        .map(|word| IndexedWord {
            selected: target == Some(word.id),
            ..word.clone()
        })
        .collect()
}

pub fn selected(words: &[IndexedWord]) -> Option<&IndexedWord> {
    words.iter().find(|word| word.selected)
}

/// First word whose text matches, ignoring case
pub fn find_by_text(words: &[IndexedWord], text: &str) -> Option<WordId> {
    let text = text.trim().to_lowercase();
    words
        .iter()
        .find(|word| word.text.to_lowercase() == text)
        .map(|word| word.id)
}

/// Word under a point in image coordinates
pub fn word_at(words: &[IndexedWord], x: i32, y: i32) -> Option<WordId> {
    words
        .iter()
        .find(|word| word.bbox.contains(x, y))
        .map(|word| word.id)
}
