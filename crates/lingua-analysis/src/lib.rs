mod error;
mod orchestrator;
mod session;
mod state;

pub use error::AnalysisError;
pub use orchestrator::{AnalysisOrchestrator, JobState};
pub use session::{AnalysisSession, NO_DATA_MESSAGE};
pub use state::{DetailsState, WordsState, merge_detail};

#[cfg(test)]
mod tests;
