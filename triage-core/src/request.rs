use serde::{Deserialize, Serialize};

use crate::error::{TriageError, TriageResult};
use crate::model::UserProfile;

static EMPTY_PROFILE: UserProfile = UserProfile {
    height: None,
    weight: None,
    allergies: Vec::new(),
    conditions: Vec::new(),
    medications: Vec::new(),
};

/// 분석 진입점 요청 본문.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub symptoms: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_profile: Option<UserProfile>,
}

impl AnalysisRequest {
    pub fn new(symptoms: impl Into<String>, user_profile: Option<UserProfile>) -> Self {
        Self {
            symptoms: symptoms.into(),
            user_profile,
        }
    }

    /// JSON 본문을 읽는다. 형식 오류는 실패한 필드 경로를 담은 검증 오류가 된다.
    pub fn from_json_str(body: &str) -> TriageResult<Self> {
        let mut deserializer = serde_json::Deserializer::from_str(body);
        let request = serde_path_to_error::deserialize(&mut deserializer).map_err(field_error)?;
        deserializer
            .end()
            .map_err(|err| TriageError::validation("request", err.to_string()))?;
        Ok(request)
    }

    pub fn from_json_value(body: serde_json::Value) -> TriageResult<Self> {
        serde_path_to_error::deserialize(body).map_err(field_error)
    }

    /// 코어 실행 전 입력 검증.
    pub fn validate(&self) -> TriageResult<()> {
        if self.symptoms.trim().is_empty() {
            return Err(TriageError::validation("symptoms", "증상을 입력해 주세요"));
        }
        if let Some(profile) = &self.user_profile {
            profile.validate()?;
        }
        Ok(())
    }

    /// 프로필이 없으면 빈 프로필.
    pub fn profile(&self) -> &UserProfile {
        self.user_profile.as_ref().unwrap_or(&EMPTY_PROFILE)
    }
}

/// 검증 오류에 쓰는 요청 필드 이름.
const REQUEST_FIELDS: &[&str] = &[
    "symptoms",
    "userProfile",
    "userProfile.height",
    "userProfile.weight",
    "userProfile.allergies",
    "userProfile.conditions",
    "userProfile.medications",
];

fn field_error(err: serde_path_to_error::Error<serde_json::Error>) -> TriageError {
    let path = err.path().to_string();
    // 목록 항목 오류(`userProfile.allergies[0]`)는 목록 필드로 보고한다.
    let base = path.split('[').next().unwrap_or_default();
    let field = REQUEST_FIELDS
        .iter()
        .copied()
        .find(|known| *known == base)
        .unwrap_or("request");
    TriageError::validation(field, format!("{path}: {}", err.into_inner()))
}
