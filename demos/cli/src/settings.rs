use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use triage_core::TriageConfig;
use triage_remote::RemoteModelConfig;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// CLI 설정 파일 (`--config`).
///
/// ```json
/// { "triage": { "classifier": "remote_model" }, "remote": { "timeout_ms": 5000 } }
/// ```
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub triage: TriageConfig,
    pub remote: RemoteModelConfig,
}

impl Settings {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("설정 파일을 읽을 수 없습니다: {}", path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("설정 파일 형식이 올바르지 않습니다: {}", path.display()))
    }

    /// 환경 변수의 API 키가 설정 파일보다 우선한다.
    pub fn apply_env_key(&mut self, env_key: Option<String>) {
        if let Some(key) = env_key.filter(|key| !key.trim().is_empty()) {
            self.remote.api_key = Some(key);
        }
    }
}
