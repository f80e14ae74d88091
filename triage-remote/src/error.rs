use triage_core::TriageError;

/// 외부 생성형 모델 호출 오류.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("API 키가 설정되지 않았습니다 (GEMINI_API_KEY)")]
    MissingApiKey,

    #[error("HTTP 클라이언트 오류: {0}")]
    Client(String),

    #[error("모델 서버에 연결할 수 없습니다: {0}")]
    Connection(String),

    #[error("모델 응답 대기 시간 초과 ({0}ms)")]
    Timeout(u64),

    #[error("모델 서버 오류 (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("모델이 내용을 생성하지 않았습니다")]
    EmptyCandidate,

    #[error("모델 응답 형식 오류: {0}")]
    Malformed(String),

    #[error("모델 응답 JSON 파싱 오류: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<RemoteError> for TriageError {
    fn from(err: RemoteError) -> Self {
        TriageError::Collaborator(err.to_string())
    }
}
