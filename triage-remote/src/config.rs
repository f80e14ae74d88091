use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";

/// 생성형 모델 연결 설정. JSON 설정 파일의 `remote` 항목으로 읽는다.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RemoteModelConfig {
    pub endpoint: String,
    pub model: String,
    /// 설정 파일보다 환경 변수(`GEMINI_API_KEY`)를 우선한다.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub timeout_ms: u64,
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for RemoteModelConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout_ms: 10_000,
            temperature: 0.3,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 2048,
        }
    }
}

impl RemoteModelConfig {
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// 공백뿐인 키는 없는 것으로 본다.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}
