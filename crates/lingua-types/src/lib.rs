pub mod detail;
pub mod types;

pub use detail::{DetailRecord, Explanation, Formality, WordMeaning};
pub use types::*;
