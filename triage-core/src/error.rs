/// 분석 파이프라인 전반의 오류.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TriageError {
    /// 요청 검증 실패. 코어 실행 전에 호출자에게 그대로 전달된다.
    #[error("입력값 오류 ({field}): {message}")]
    Validation {
        field: &'static str,
        message: String,
    },
    /// 외부 분석 서비스 실패. 결정적 분석으로 대체 가능하다.
    #[error("외부 분석 서비스 오류: {0}")]
    Collaborator(String),
    /// 규칙 테이블 구성 오류. 엔진 생성 시점에 즉시 실패시킨다.
    #[error("규칙 테이블 구성 오류: {0}")]
    Invariant(String),
}

impl TriageError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        TriageError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn is_recoverable(&self) -> bool {
        matches!(self, TriageError::Collaborator(_))
    }
}

pub type TriageResult<T> = Result<T, TriageError>;
