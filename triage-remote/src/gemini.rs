use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::RemoteModelConfig;
use crate::error::RemoteError;

/// 프롬프트 하나를 보내고 생성된 텍스트를 받는 모델 호출부.
pub trait GenerativeModel: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String, RemoteError>;
}

/// Gemini `generateContent` HTTP 클라이언트.
pub struct GeminiClient {
    url: String,
    api_key: String,
    timeout_ms: u64,
    generation: GenerationConfig,
    client: reqwest::blocking::Client,
}

impl GeminiClient {
    pub fn new(config: &RemoteModelConfig) -> Result<Self, RemoteError> {
        let api_key = config.api_key().ok_or(RemoteError::MissingApiKey)?;
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| RemoteError::Client(e.to_string()))?;

        Ok(Self {
            url: format!(
                "{}/models/{}:generateContent",
                config.endpoint.trim_end_matches('/'),
                config.model
            ),
            api_key: api_key.to_string(),
            timeout_ms: config.timeout_ms,
            generation: GenerationConfig {
                temperature: config.temperature,
                top_k: config.top_k,
                top_p: config.top_p,
                max_output_tokens: config.max_output_tokens,
            },
            client,
        })
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
    #[serde(rename = "generationConfig")]
    generation_config: &'a GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|text| !text.trim().is_empty())
    }
}

impl GenerativeModel for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, RemoteError> {
        let body = GenerateRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
            generation_config: &self.generation,
        };

        // 키는 URL이 아니라 헤더로 보낸다. reqwest 오류 메시지에 URL이 그대로 찍힌다.
        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    RemoteError::Timeout(self.timeout_ms)
                } else if e.is_connect() {
                    RemoteError::Connection(e.to_string())
                } else {
                    RemoteError::Client(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| RemoteError::Malformed(e.to_string()))?;
        tracing::debug!(candidates = parsed.candidates.len(), "gemini response received");

        parsed.first_text().ok_or(RemoteError::EmptyCandidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_body_matches_generate_content_shape() {
        let generation = GenerationConfig {
            temperature: 0.3,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 2048,
        };
        let body = GenerateRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: "증상" }],
            }],
            generation_config: &generation,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], json!("증상"));
        assert_eq!(value["generationConfig"]["topK"], json!(40));
        assert_eq!(value["generationConfig"]["maxOutputTokens"], json!(2048));
    }

    #[test]
    fn first_candidate_text_is_extracted() {
        let parsed: GenerateResponse = serde_json::from_value(json!({
            "candidates": [
                { "content": { "parts": [{ "text": "{\"riskLevel\":\"low\"}" }] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        }))
        .unwrap();
        assert_eq!(parsed.first_text().as_deref(), Some("{\"riskLevel\":\"low\"}"));
    }

    #[test]
    fn missing_or_blank_candidates_yield_none() {
        let empty: GenerateResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.first_text(), None);

        let blank: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "text": "  " }] } }]
        }))
        .unwrap();
        assert_eq!(blank.first_text(), None);
    }

    #[test]
    fn client_requires_api_key() {
        let err = GeminiClient::new(&RemoteModelConfig::default()).err();
        assert!(matches!(err, Some(RemoteError::MissingApiKey)));
    }

    #[test]
    fn endpoint_trailing_slash_is_ignored() {
        let cfg = RemoteModelConfig {
            endpoint: "http://localhost:9999/v1beta/".into(),
            ..RemoteModelConfig::default()
        }
        .with_api_key("k");
        let client = GeminiClient::new(&cfg).unwrap();
        assert_eq!(
            client.url,
            "http://localhost:9999/v1beta/models/gemini-1.5-flash-latest:generateContent"
        );
    }
}
