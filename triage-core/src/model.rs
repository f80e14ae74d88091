//! 분석 결과와 사용자 프로필을 표현하는 데이터 모델.
//!
//! JSON 필드 이름은 프런트엔드가 소비하는 camelCase 형식을 따른다.

use serde::{Deserialize, Serialize};

/// 사용자 건강 프로필. 분석 호출에는 불변 참조로만 전달된다.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// 키 (cm).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// 몸무게 (kg).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default)]
    pub allergies: Vec<String>,
    /// 기저질환.
    #[serde(default)]
    pub conditions: Vec<String>,
    /// 복용 중인 약물.
    #[serde(default)]
    pub medications: Vec<String>,
}

/// 위험도 단계. `High > Medium > Low` 순으로 정렬된다.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }

    /// 외부 모델이 돌려준 문자열을 해석한다.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "high" => Some(RiskLevel::High),
            "medium" | "moderate" => Some(RiskLevel::Medium),
            "low" => Some(RiskLevel::Low),
            _ => None,
        }
    }
}

/// 응급 의료기관 정보.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmergencyFacility {
    pub name: String,
    pub distance: String,
    pub address: String,
    pub phone: String,
    pub lat: f64,
    pub lng: f64,
}

/// 고위험 판정 시에만 붙는 응급 안내 블록.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmergencyInfo {
    pub message: String,
    pub hospitals: Vec<EmergencyFacility>,
}

/// 위험도 평가. `emergency`는 `level == High`일 때만 존재한다.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub title: String,
    pub description: String,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency: Option<EmergencyInfo>,
}

impl RiskAssessment {
    pub fn is_emergency(&self) -> bool {
        self.level == RiskLevel::High
    }
}

/// 예상 질환. `probability`는 설명용 문자열이며 계산된 확률이 아니다.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Condition {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<String>,
}

/// 일반의약품 추천 항목.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medicine {
    pub name: String,
    pub effect: String,
    pub price: String,
    #[serde(default)]
    pub contraindications: Vec<String>,
    #[serde(default)]
    pub interactions: Vec<String>,
}

/// 오프라인 판매처 정보 (약국, 편의점).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreFront {
    pub distance: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub phone: String,
}

/// 온라인 판매처 정보.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OnlineStore {
    pub url: String,
    pub delivery_info: String,
}

/// 판매처 종류와 종류별 필드 묶음.
///
/// 종류가 필드 묶음을 결정하므로 오프라인/온라인 필드가 섞일 수 없다.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LocationChannel {
    Pharmacy(StoreFront),
    ConvenienceStore(StoreFront),
    OnlineStore(OnlineStore),
}

impl LocationChannel {
    pub fn kind(&self) -> LocationKind {
        match self {
            LocationChannel::Pharmacy(_) => LocationKind::Pharmacy,
            LocationChannel::ConvenienceStore(_) => LocationKind::ConvenienceStore,
            LocationChannel::OnlineStore(_) => LocationKind::OnlineStore,
        }
    }

    pub fn store_front(&self) -> Option<&StoreFront> {
        match self {
            LocationChannel::Pharmacy(front) | LocationChannel::ConvenienceStore(front) => {
                Some(front)
            }
            LocationChannel::OnlineStore(_) => None,
        }
    }

    pub fn online(&self) -> Option<&OnlineStore> {
        match self {
            LocationChannel::OnlineStore(online) => Some(online),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    Pharmacy,
    ConvenienceStore,
    OnlineStore,
}

/// 약을 구매할 수 있는 장소.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SalesLocation {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub channel: LocationChannel,
    pub operating_hours: String,
    pub is_open: bool,
    pub current_status: String,
}

/// 분석 1회의 최종 결과. 생성 후에는 변경하지 않는다.
///
/// 고위험이면 `risk_assessment` 외의 선택 필드는 모두 `None`이다.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecommendation {
    pub symptoms: String,
    pub risk_assessment: RiskAssessment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disease: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_diseases: Option<Vec<Condition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medicines: Option<Vec<Medicine>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personalized_warnings: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_locations: Option<Vec<SalesLocation>>,
}

impl MedicalRecommendation {
    /// 응급 안내만 담은 결과를 만든다.
    pub fn emergency(symptoms: &str, risk_assessment: RiskAssessment) -> Self {
        Self {
            symptoms: symptoms.to_string(),
            risk_assessment,
            disease: None,
            description: None,
            alternative_diseases: None,
            medicines: None,
            personalized_warnings: None,
            sales_locations: None,
        }
    }

    /// 질환, 약, 판매처까지 채운 전체 결과를 만든다.
    pub fn full(
        symptoms: &str,
        risk_assessment: RiskAssessment,
        primary: Condition,
        alternatives: Vec<Condition>,
        medicines: Vec<Medicine>,
        warnings: Vec<String>,
        locations: Vec<SalesLocation>,
    ) -> Self {
        Self {
            symptoms: symptoms.to_string(),
            risk_assessment,
            disease: Some(primary.name),
            description: Some(primary.description),
            alternative_diseases: Some(alternatives),
            medicines: Some(medicines),
            personalized_warnings: Some(warnings),
            sales_locations: Some(locations),
        }
    }

    pub fn is_emergency(&self) -> bool {
        self.risk_assessment.is_emergency()
    }

    pub fn medicine_names(&self) -> Vec<&str> {
        self.medicines
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|medicine| medicine.name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn risk_levels_are_ordered_by_severity() {
        assert!(RiskLevel::High > RiskLevel::Medium);
        assert!(RiskLevel::Medium > RiskLevel::Low);
        assert_eq!(RiskLevel::parse(" HIGH "), Some(RiskLevel::High));
        assert_eq!(RiskLevel::parse("moderate"), Some(RiskLevel::Medium));
        assert_eq!(RiskLevel::parse("critical"), None);
    }

    #[test]
    fn online_location_serializes_without_physical_fields() {
        let location = SalesLocation {
            id: "online1".into(),
            name: "온라인약국 헬스케어".into(),
            channel: LocationChannel::OnlineStore(OnlineStore {
                url: "https://www.healthcare.co.kr".into(),
                delivery_info: "당일배송".into(),
            }),
            operating_hours: "24시간 주문 가능".into(),
            is_open: true,
            current_status: "주문 가능".into(),
        };

        let value = serde_json::to_value(&location).unwrap();
        assert_eq!(value["type"], json!("online_store"));
        assert_eq!(value["deliveryInfo"], json!("당일배송"));
        assert_eq!(value["isOpen"], json!(true));
        assert!(value.get("address").is_none());
        assert!(value.get("lat").is_none());

        let back: SalesLocation = serde_json::from_value(value).unwrap();
        assert_eq!(back.channel.kind(), LocationKind::OnlineStore);
    }

    #[test]
    fn emergency_recommendation_omits_optional_fields() {
        let assessment = RiskAssessment {
            level: RiskLevel::High,
            title: "t".into(),
            description: "d".into(),
            action: "a".into(),
            emergency: None,
        };
        let value = serde_json::to_value(MedicalRecommendation::emergency("x", assessment)).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert!(object.contains_key("riskAssessment"));
        assert!(!object.contains_key("medicines"));
    }

    #[test]
    fn profile_accepts_partial_json() {
        let profile: UserProfile =
            serde_json::from_value(json!({ "allergies": ["페니실린"] })).unwrap();
        assert_eq!(profile.allergies, vec!["페니실린".to_string()]);
        assert!(profile.height.is_none());
        assert!(profile.medications.is_empty());
    }
}
