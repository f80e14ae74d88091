//! 위험 키워드 기반 위험도 분류.

use crate::catalog::Catalog;
use crate::model::{EmergencyFacility, EmergencyInfo, RiskAssessment, RiskLevel};
use crate::rules::{normalize, Trigger};

pub const EMERGENCY_MESSAGE: &str = "즉시 응급의료기관을 방문하세요.";

struct Guidance {
    title: &'static str,
    description: &'static str,
    action: &'static str,
}

const HIGH_GUIDANCE: Guidance = Guidance {
    title: "응급 상황 의심",
    description: "즉각적인 의료 처치가 필요할 수 있는 증상이 포함되어 있습니다.",
    action: "일반의약품 복용을 미루고 즉시 119에 연락하거나 가까운 응급실을 방문하세요.",
};

const MEDIUM_GUIDANCE: Guidance = Guidance {
    title: "주의 필요",
    description: "증상이 지속되거나 악화될 가능성이 있습니다.",
    action: "일반의약품으로 증상을 관리하되 24~48시간 내 호전이 없으면 병원 진료를 받으세요.",
};

const LOW_GUIDANCE: Guidance = Guidance {
    title: "경미한 증상",
    description: "일반의약품과 충분한 휴식으로 관리 가능한 증상으로 보입니다.",
    action: "안내된 약의 용법을 지키고 증상이 심해지면 전문의와 상담하세요.",
};

/// 고위험 → 주의 순서로 키워드를 검사한다. 가중치는 없다.
#[derive(Debug, Clone)]
pub struct RiskClassifier {
    high: Vec<Trigger>,
    medium: Vec<Trigger>,
    hospitals: Vec<EmergencyFacility>,
}

impl RiskClassifier {
    /// `catalog`은 [`Catalog::validate`]를 통과한 상태여야 한다.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self {
            high: compile(&catalog.high_risk_keywords),
            medium: compile(&catalog.medium_risk_keywords),
            hospitals: catalog.hospitals.clone(),
        }
    }

    pub fn classify(&self, symptoms: &str) -> RiskAssessment {
        self.classify_normalized(&normalize(symptoms))
    }

    pub(crate) fn classify_normalized(&self, normalized: &str) -> RiskAssessment {
        if self.high.iter().any(|t| t.matches(normalized)) {
            return self.emergency_assessment();
        }
        if self.medium.iter().any(|t| t.matches(normalized)) {
            return assessment(RiskLevel::Medium, &MEDIUM_GUIDANCE);
        }
        assessment(RiskLevel::Low, &LOW_GUIDANCE)
    }

    /// 고위험 평가. 병원 목록은 일치한 키워드와 무관하게 고정이다.
    pub fn emergency_assessment(&self) -> RiskAssessment {
        let mut assessment = assessment(RiskLevel::High, &HIGH_GUIDANCE);
        assessment.emergency = Some(self.emergency_info());
        assessment
    }

    pub fn emergency_info(&self) -> EmergencyInfo {
        EmergencyInfo {
            message: EMERGENCY_MESSAGE.to_string(),
            hospitals: self.hospitals.clone(),
        }
    }

    /// 해당 단계의 고정 안내 문구로 평가를 만든다.
    pub fn guidance(&self, level: RiskLevel) -> RiskAssessment {
        match level {
            RiskLevel::High => self.emergency_assessment(),
            RiskLevel::Medium => assessment(RiskLevel::Medium, &MEDIUM_GUIDANCE),
            RiskLevel::Low => assessment(RiskLevel::Low, &LOW_GUIDANCE),
        }
    }
}

fn compile(keywords: &[String]) -> Vec<Trigger> {
    keywords
        .iter()
        .filter_map(|keyword| Trigger::from_keyword(keyword))
        .collect()
}

fn assessment(level: RiskLevel, guidance: &Guidance) -> RiskAssessment {
    RiskAssessment {
        level,
        title: guidance.title.to_string(),
        description: guidance.description.to_string(),
        action: guidance.action.to_string(),
        emergency: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    fn classifier() -> RiskClassifier {
        RiskClassifier::from_catalog(&catalog::builtin())
    }

    #[test]
    fn chest_pain_with_breathing_trouble_is_high() {
        let risk = classifier().classify("가슴이 너무 아프고 숨을 못 쉬겠어");
        assert_eq!(risk.level, RiskLevel::High);
        let emergency = risk.emergency.expect("응급 블록 필요");
        assert!(!emergency.hospitals.is_empty());
        assert_eq!(emergency.message, EMERGENCY_MESSAGE);
    }

    #[test]
    fn high_risk_takes_precedence_over_medium() {
        let risk = classifier().classify("고열이 계속되고 경련이 있어요");
        assert_eq!(risk.level, RiskLevel::High);
    }

    #[test]
    fn incidental_chest_or_consciousness_words_are_not_high() {
        let c = classifier();
        assert_eq!(c.classify("의식은 또렷하고 목이 따가워요").level, RiskLevel::Low);
        assert_eq!(c.classify("배가 아프고 가슴이 답답해요").level, RiskLevel::Medium);
        assert_eq!(c.classify("어제 의식을 잃었어요").level, RiskLevel::High);
        assert_eq!(c.classify("가슴이 아파요").level, RiskLevel::High);
    }

    #[test]
    fn medium_keywords_without_high_keywords() {
        let risk = classifier().classify("고열이 사흘째 계속돼요");
        assert_eq!(risk.level, RiskLevel::Medium);
        assert!(risk.emergency.is_none());
    }

    #[test]
    fn unmatched_text_is_low() {
        let c = classifier();
        for text in ["머리가 아프다", "콧물이 나요", "", "   ", "배가 아프고 열이 나"] {
            let risk = c.classify(text);
            assert_eq!(risk.level, RiskLevel::Low, "{text}");
            assert!(risk.emergency.is_none());
        }
    }

    #[test]
    fn english_keywords_are_case_insensitive() {
        assert_eq!(
            classifier().classify("Sudden CHEST PAIN").level,
            RiskLevel::High
        );
    }

    #[test]
    fn hospital_list_does_not_depend_on_keyword() {
        let c = classifier();
        let a = c.classify("실신했어요");
        let b = c.classify("피를 토했어요");
        assert_eq!(a.emergency, b.emergency);
    }
}
