//! 외부 생성형 모델(Gemini)을 이용한 증상 분석.
//!
//! 모델 호출이 실패하거나 응답을 읽을 수 없으면 결정적 엔진 결과로 대체한다.

mod classifier;
mod config;
mod error;
mod gemini;
mod prompt;
mod response;

pub use classifier::{classifier_from_config, RemoteModelClassifier};
pub use config::{RemoteModelConfig, DEFAULT_ENDPOINT, DEFAULT_MODEL};
pub use error::RemoteError;
pub use gemini::{GeminiClient, GenerativeModel};
pub use prompt::build_prompt;
pub use response::{parse_model_response, strip_code_fences, RemoteAnalysis};
