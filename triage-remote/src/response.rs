use serde::Deserialize;
use triage_core::{Condition, Medicine, RiskLevel};

use crate::error::RemoteError;

/// 모델 응답에서 읽어낸 분석 결과.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteAnalysis {
    pub level: RiskLevel,
    pub title: Option<String>,
    pub description: Option<String>,
    pub action: Option<String>,
    pub disease: Option<String>,
    pub disease_description: Option<String>,
    pub alternatives: Vec<Condition>,
    pub medicines: Vec<Medicine>,
    pub warnings: Vec<String>,
    pub needs_emergency: bool,
}

impl RemoteAnalysis {
    /// `needsEmergency`는 위험도 표기와 관계없이 고위험으로 본다.
    pub fn effective_level(&self) -> RiskLevel {
        if self.needs_emergency {
            RiskLevel::High
        } else {
            self.level
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnalysis {
    risk_level: Option<String>,
    risk_title: Option<String>,
    risk_description: Option<String>,
    risk_action: Option<String>,
    disease: Option<String>,
    disease_description: Option<String>,
    alternative_diseases: Option<Vec<serde_json::Value>>,
    medicines: Option<Vec<serde_json::Value>>,
    personalized_warnings: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    needs_emergency: bool,
}

#[derive(Deserialize)]
struct RawCondition {
    name: String,
    #[serde(default)]
    description: String,
    probability: Option<String>,
}

#[derive(Deserialize)]
struct RawMedicine {
    name: String,
    #[serde(default)]
    effect: String,
    #[serde(default)]
    price: String,
    #[serde(default)]
    contraindications: Vec<String>,
    #[serde(default)]
    interactions: Vec<String>,
}

/// ```` ```json ```` 같은 코드 블록 표시를 걷어낸다.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest.trim_start_matches("json"),
    };
    body.trim_end().trim_end_matches("```").trim()
}

/// 생성된 텍스트를 분석 결과로 읽는다.
///
/// 배열 항목 중 형식이 맞지 않는 것은 건너뛴다. 위험도가 없거나 알 수 없는 값이면, 또는
/// 고위험이 아닌데 질환명이 없으면 오류다.
pub fn parse_model_response(text: &str) -> Result<RemoteAnalysis, RemoteError> {
    let json = extract_object(strip_code_fences(text))?;
    let raw: RawAnalysis = serde_json::from_str(json)?;

    let level = raw
        .risk_level
        .as_deref()
        .and_then(RiskLevel::parse)
        .ok_or_else(|| {
            RemoteError::Malformed(format!(
                "riskLevel 값이 올바르지 않습니다: {:?}",
                raw.risk_level
            ))
        })?;

    let analysis = RemoteAnalysis {
        level,
        title: non_blank(raw.risk_title),
        description: non_blank(raw.risk_description),
        action: non_blank(raw.risk_action),
        disease: non_blank(raw.disease),
        disease_description: non_blank(raw.disease_description),
        alternatives: lenient(raw.alternative_diseases)
            .filter_map(|c: RawCondition| {
                let name = c.name.trim().to_string();
                (!name.is_empty()).then(|| Condition {
                    name,
                    description: c.description,
                    probability: c.probability,
                })
            })
            .collect(),
        medicines: lenient(raw.medicines)
            .filter_map(|m: RawMedicine| {
                let name = m.name.trim().to_string();
                (!name.is_empty()).then(|| Medicine {
                    name,
                    effect: m.effect,
                    price: m.price,
                    contraindications: m.contraindications,
                    interactions: m.interactions,
                })
            })
            .collect(),
        warnings: lenient(raw.personalized_warnings)
            .filter_map(|w: String| non_blank(Some(w)))
            .collect(),
        needs_emergency: raw.needs_emergency,
    };

    if analysis.effective_level() != RiskLevel::High && analysis.disease.is_none() {
        return Err(RemoteError::Malformed("disease 항목이 없습니다".into()));
    }
    Ok(analysis)
}

/// 앞뒤 설명문이 붙은 응답에서 JSON 객체 부분만 잘라낸다.
fn extract_object(text: &str) -> Result<&str, RemoteError> {
    let start = text.find('{');
    let end = text.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start < end => Ok(&text[start..=end]),
        _ => Err(RemoteError::Malformed("JSON 객체를 찾을 수 없습니다".into())),
    }
}

fn lenient<T: serde::de::DeserializeOwned>(
    values: Option<Vec<serde_json::Value>>,
) -> impl Iterator<Item = T> {
    values
        .unwrap_or_default()
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
