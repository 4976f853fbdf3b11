use futures_util::StreamExt;
use reqwest::Url;
use tokio_util::io::StreamReader;

use crate::model::{GenerateRequest, GenerateResponse};
use crate::{ExplanationService, LineReader, LlmError};

/// Ollama `/api/generate` client.
///
/// The endpoint is passed per call so address changes in settings apply to the
/// next request. No timeouts are set: a hung server hangs the call until the
/// caller cancels it.
#[derive(Clone, Default)]
pub struct OllamaClient {
    client: reqwest::Client,
}

impl OllamaClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn post(
        &self,
        endpoint: &str,
        request: &GenerateRequest,
    ) -> Result<reqwest::Response, LlmError> {
        let url = generate_url(endpoint)?;
        tracing::debug!(
            "[LLM] POST {} model={} stream={}",
            url,
            request.model,
            request.stream
        );

        let response = self.client.post(url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }
}

/// `host:port` or a full URL, with or without a trailing slash
pub fn generate_url(endpoint: &str) -> Result<Url, LlmError> {
    let endpoint = endpoint.trim().trim_end_matches('/');
    if endpoint.is_empty() {
        return Err(LlmError::InvalidEndpoint("empty address".into()));
    }

    let base = if endpoint.contains("://") {
        endpoint.to_string()
    } else {
        format!("http://{endpoint}")
    };

    Url::parse(&format!("{base}/api/generate"))
        .map_err(|e| LlmError::InvalidEndpoint(format!("{endpoint}: {e}")))
}

#[async_trait::async_trait]
impl ExplanationService for OllamaClient {
    async fn generate_stream(
        &self,
        endpoint: &str,
        request: &GenerateRequest,
    ) -> Result<LineReader, LlmError> {
        let response = self.post(endpoint, request).await?;
        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(std::io::Error::other));

        Ok(Box::pin(StreamReader::new(body)))
    }

    async fn generate(
        &self,
        endpoint: &str,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, LlmError> {
        let response = self.post(endpoint, request).await?;

        response
            .json::<GenerateResponse>()
            .await
            .map_err(|e| LlmError::UnexpectedResponse(format!("Failed to parse response: {}", e)))
    }
}
