use lingua_llm::{LlmError, StreamError};

/// Failure of an analysis job. `Cancelled` is an outcome, not an error shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("No model name provided")]
    MissingModel,

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Stream(StreamError),

    #[error("Analysis cancelled")]
    Cancelled,
}

impl From<StreamError> for AnalysisError {
    fn from(e: StreamError) -> Self {
        match e {
            StreamError::Cancelled => AnalysisError::Cancelled,
            other => AnalysisError::Stream(other),
        }
    }
}
