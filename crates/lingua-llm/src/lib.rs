use std::pin::Pin;

use tokio::io::AsyncBufRead;

pub mod client;
pub mod model;
pub mod prompt;
pub mod stream;

pub use client::OllamaClient;
pub use model::{GenerateChunk, GenerateRequest, GenerateResponse};
pub use stream::{StreamError, StreamingResponseParser, ThinkState, TokenAccumulator};

/// Line-delimited response body of a streamed generation
pub type LineReader = Pin<Box<dyn AsyncBufRead + Send>>;

/// Local LLM provider interface
#[async_trait::async_trait]
pub trait ExplanationService: Send + Sync {
    /// Open a streamed generation, one JSON object per line
    async fn generate_stream(
        &self,
        endpoint: &str,
        request: &GenerateRequest,
    ) -> Result<LineReader, LlmError>;

    /// Run a single non-streamed generation
    async fn generate(
        &self,
        endpoint: &str,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, LlmError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("API error: HTTP {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid endpoint address: {0}")]
    InvalidEndpoint(String),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}
