use lingua_types::Formality;
use serde::{Deserialize, Serialize};

use crate::LlmError;

/// Body of `POST /api/generate`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
    /// JSON schema the answer must follow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<serde_json::Value>,
}

/// One line of a streamed generation
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateChunk {
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub created_at: String,
    /// Newest token
    pub response: Option<String>,
    #[serde(default)]
    pub done: bool,
    /// Only present on the final line
    pub total_duration: Option<u64>,
    pub error: Option<String>,
}

/// Full non-streamed generation
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub created_at: String,
    pub response: String,
    #[serde(default)]
    pub done: bool,
    pub total_duration: Option<u64>,
    pub load_duration: Option<u64>,
    pub prompt_eval_count: Option<u32>,
    pub eval_count: Option<u32>,
    pub eval_duration: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct FormalityAnswer {
    formality: f32,
}

impl GenerateResponse {
    /// Read the `{"formality": n}` answer, skipping any reasoning block before it
    pub fn to_formality(&self) -> Result<Formality, LlmError> {
        let answer = match self.response.rfind(crate::stream::THINK_CLOSE) {
            Some(pos) => &self.response[pos + crate::stream::THINK_CLOSE.len()..],
            None => self.response.as_str(),
        };

        let parsed: FormalityAnswer = serde_json::from_str(answer.trim()).map_err(|e| {
            LlmError::UnexpectedResponse(format!("Failed to parse formality: {}", e))
        })?;

        Ok(Formality {
            score: parsed.formality,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(text: &str) -> GenerateResponse {
        GenerateResponse {
            model: "qwen3:32b".into(),
            created_at: String::new(),
            response: text.into(),
            done: true,
            total_duration: None,
            load_duration: None,
            prompt_eval_count: None,
            eval_count: None,
            eval_duration: None,
        }
    }

    #[test]
    fn test_formality_from_structured_answer() {
        let formality = response(r#"{"formality": 0.2}"#).to_formality().unwrap();
        assert_eq!(formality.score, 0.2);
    }

    #[test]
    fn test_formality_after_reasoning_block() {
        let formality = response("<think>\nformal register\n</think>\n\n{\"formality\": 0.85}")
            .to_formality()
            .unwrap();
        assert_eq!(formality.score, 0.85);
    }

    #[test]
    fn test_formality_out_of_range_is_not_clamped() {
        let formality = response(r#"{"formality": 1.5}"#).to_formality().unwrap();
        assert_eq!(formality.score, 1.5);
    }

    #[test]
    fn test_formality_missing_field_fails() {
        let result = response(r#"{"score": 0.5}"#).to_formality();
        assert!(matches!(result, Err(LlmError::UnexpectedResponse(_))));
    }

    #[test]
    fn test_full_response_parses() {
        let parsed: GenerateResponse = serde_json::from_str(
            r#"{
              "model": "llama3.1",
              "created_at": "2024-06-27T12:00:00Z",
              "response": "The sky appears blue due to a phenomenon called Rayleigh scattering.",
              "done": true,
              "total_duration": 1234567890,
              "load_duration": 123456789,
              "prompt_eval_count": 10,
              "prompt_eval_duration": 12345678,
              "eval_count": 50,
              "eval_duration": 123456789
            }"#,
        )
        .unwrap();
        assert_eq!(
            parsed.response,
            "The sky appears blue due to a phenomenon called Rayleigh scattering."
        );
        assert_eq!(parsed.total_duration, Some(1234567890));
    }

    #[test]
    fn test_request_omits_absent_format() {
        let request = GenerateRequest {
            model: "m".into(),
            prompt: "p".into(),
            stream: true,
            format: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("format").is_none());
        assert_eq!(json["stream"], true);
    }
}
