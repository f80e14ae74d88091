use serde::{Deserialize, Serialize};

/// 분석 방식 선택.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    /// 키워드 규칙 기반 분석.
    #[default]
    Deterministic,
    /// 외부 생성형 모델 분석. 실패하면 결정적 분석으로 대체한다.
    RemoteModel,
}

/// 엔진 설정. 내장 키워드 목록에 추가 키워드를 덧붙일 수 있다.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TriageConfig {
    /// 고위험으로 판정할 추가 키워드 (`a+b` 형식 허용).
    #[serde(default)]
    pub extra_high_risk_keywords: Vec<String>,
    /// 주의 단계로 판정할 추가 키워드.
    #[serde(default)]
    pub extra_medium_risk_keywords: Vec<String>,
    #[serde(default)]
    pub classifier: ClassifierKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let cfg: TriageConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, TriageConfig::default());
        assert_eq!(cfg.classifier, ClassifierKind::Deterministic);
    }

    #[test]
    fn classifier_kind_uses_snake_case() {
        let cfg: TriageConfig =
            serde_json::from_str(r#"{ "classifier": "remote_model" }"#).unwrap();
        assert_eq!(cfg.classifier, ClassifierKind::RemoteModel);
    }
}
