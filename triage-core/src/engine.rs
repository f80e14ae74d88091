//! 분석 단계를 조립해 최종 추천 결과를 만든다.

use std::fmt;
use std::sync::Arc;

use crate::catalog::{self, Catalog};
use crate::condition::ConditionMatcher;
use crate::config::TriageConfig;
use crate::error::TriageResult;
use crate::location::{LocationProvider, StaticLocationProvider};
use crate::medicine::MedicineSelector;
use crate::model::{MedicalRecommendation, UserProfile};
use crate::request::AnalysisRequest;
use crate::risk::RiskClassifier;
use crate::rules::normalize;

/// 증상과 프로필로 추천 결과를 만드는 분석 방식.
pub trait Classifier: Send + Sync {
    fn recommend(
        &self,
        symptoms: &str,
        profile: &UserProfile,
    ) -> TriageResult<MedicalRecommendation>;
}

/// 분석 1회의 진행 단계.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStage {
    Classifying,
    EmergencyAssembled,
    Matching,
    Filtering,
    Locating,
    Assembled,
}

impl fmt::Display for AnalysisStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnalysisStage::Classifying => "classifying",
            AnalysisStage::EmergencyAssembled => "emergency_assembled",
            AnalysisStage::Matching => "matching",
            AnalysisStage::Filtering => "filtering",
            AnalysisStage::Locating => "locating",
            AnalysisStage::Assembled => "assembled",
        };
        f.write_str(name)
    }
}

/// 키워드 규칙 기반 분석 엔진.
///
/// 생성 시 테이블을 검증하고, 이후에는 읽기 전용이라 여러 스레드에서 공유할 수 있다.
pub struct TriageEngine {
    risk: RiskClassifier,
    conditions: ConditionMatcher,
    medicines: MedicineSelector,
    locations: Box<dyn LocationProvider>,
}

impl TriageEngine {
    pub fn new(catalog: Catalog) -> TriageResult<Self> {
        catalog.validate()?;
        Ok(Self {
            risk: RiskClassifier::from_catalog(&catalog),
            conditions: ConditionMatcher::from_catalog(&catalog),
            medicines: MedicineSelector::from_catalog(&catalog)?,
            locations: Box::new(StaticLocationProvider::from_catalog(&catalog)?),
        })
    }

    pub fn builtin() -> TriageResult<Self> {
        Self::new(catalog::builtin())
    }

    pub fn from_config(config: &TriageConfig) -> TriageResult<Self> {
        Self::new(catalog::builtin().with_config(config))
    }

    /// 판매처 조회 구현을 교체한다.
    pub fn with_location_provider(mut self, provider: impl LocationProvider + 'static) -> Self {
        self.locations = Box::new(provider);
        self
    }

    pub fn risk_classifier(&self) -> &RiskClassifier {
        &self.risk
    }

    pub fn condition_matcher(&self) -> &ConditionMatcher {
        &self.conditions
    }

    pub fn medicine_selector(&self) -> &MedicineSelector {
        &self.medicines
    }

    pub fn location_provider(&self) -> &dyn LocationProvider {
        self.locations.as_ref()
    }

    /// 위험도가 높으면 응급 안내만 담아 바로 돌려준다.
    pub fn assemble(&self, symptoms: &str, profile: &UserProfile) -> MedicalRecommendation {
        let normalized = normalize(symptoms);

        tracing::debug!(stage = %AnalysisStage::Classifying, "analysis stage");
        let risk = self.risk.classify_normalized(&normalized);
        if risk.is_emergency() {
            tracing::info!(stage = %AnalysisStage::EmergencyAssembled, "high risk, skipping recommendation stages");
            return MedicalRecommendation::emergency(symptoms, risk);
        }

        tracing::debug!(stage = %AnalysisStage::Matching, level = risk.level.as_str(), "analysis stage");
        let matched = self.conditions.match_normalized(&normalized);

        tracing::debug!(stage = %AnalysisStage::Filtering, condition = %matched.primary.name, "analysis stage");
        let selection = self.medicines.select(&matched.primary, profile);

        tracing::debug!(stage = %AnalysisStage::Locating, "analysis stage");
        let locations = self.locations.locate(&matched.primary);

        tracing::debug!(
            stage = %AnalysisStage::Assembled,
            medicines = selection.medicines.len(),
            warnings = selection.warnings.len(),
            "analysis stage"
        );
        MedicalRecommendation::full(
            symptoms,
            risk,
            matched.primary,
            matched.alternatives,
            selection.medicines,
            selection.warnings,
            locations,
        )
    }
}

impl fmt::Debug for TriageEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriageEngine")
            .field("risk", &self.risk)
            .field("conditions", &self.conditions)
            .finish_non_exhaustive()
    }
}

impl Classifier for TriageEngine {
    fn recommend(
        &self,
        symptoms: &str,
        profile: &UserProfile,
    ) -> TriageResult<MedicalRecommendation> {
        Ok(self.assemble(symptoms, profile))
    }
}

impl<C: Classifier + ?Sized> Classifier for Arc<C> {
    fn recommend(
        &self,
        symptoms: &str,
        profile: &UserProfile,
    ) -> TriageResult<MedicalRecommendation> {
        (**self).recommend(symptoms, profile)
    }
}

/// 분석 진입점: 요청을 검증한 뒤 선택된 분석 방식에 넘긴다.
pub fn analyze(
    classifier: &dyn Classifier,
    request: &AnalysisRequest,
) -> TriageResult<MedicalRecommendation> {
    request.validate()?;
    classifier.recommend(&request.symptoms, request.profile())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TriageError;
    use crate::location::FixedLocationProvider;
    use crate::model::RiskLevel;

    fn engine() -> TriageEngine {
        TriageEngine::builtin().unwrap()
    }

    #[test]
    fn medium_risk_still_returns_full_recommendation() {
        let rec = engine().assemble("기침이 일주일째 계속돼요", &UserProfile::default());
        assert_eq!(rec.risk_assessment.level, RiskLevel::Medium);
        assert_eq!(rec.disease.as_deref(), Some("감기"));
        assert!(rec.medicines.is_some());
        assert!(rec.sales_locations.is_some());
    }

    #[test]
    fn emergency_response_has_no_recommendation_fields() {
        let rec = engine().assemble("갑자기 의식을 잃었어요", &UserProfile::default());
        assert!(rec.is_emergency());
        assert!(rec.disease.is_none());
        assert!(rec.description.is_none());
        assert!(rec.alternative_diseases.is_none());
        assert!(rec.medicines.is_none());
        assert!(rec.personalized_warnings.is_none());
        assert!(rec.sales_locations.is_none());
    }

    #[test]
    fn symptoms_are_echoed_verbatim() {
        let rec = engine().assemble("  Cough ", &UserProfile::default());
        assert_eq!(rec.symptoms, "  Cough ");
    }

    #[test]
    fn injected_location_provider_is_used() {
        let engine = engine().with_location_provider(FixedLocationProvider::new(Vec::new()));
        let rec = engine.assemble("콧물", &UserProfile::default());
        assert_eq!(rec.sales_locations, Some(Vec::new()));
    }

    #[test]
    fn analyze_rejects_blank_symptoms_before_classifying() {
        let err = analyze(&engine(), &AnalysisRequest::new("  ", None)).unwrap_err();
        assert!(matches!(err, TriageError::Validation { field: "symptoms", .. }));
    }

    #[test]
    fn extra_keywords_from_config_extend_tiers() {
        let config = TriageConfig {
            extra_high_risk_keywords: vec!["아나필락시스".into()],
            extra_medium_risk_keywords: vec!["오한+몸살".into()],
            ..TriageConfig::default()
        };
        let engine = TriageEngine::from_config(&config).unwrap();
        let profile = UserProfile::default();
        assert!(engine.assemble("아나필락시스 증상", &profile).is_emergency());
        assert_eq!(
            engine.assemble("오한이 들고 몸살 기운", &profile).risk_assessment.level,
            RiskLevel::Medium
        );
    }

    #[test]
    fn broken_catalog_fails_at_construction() {
        let mut catalog = catalog::builtin();
        catalog.hospitals.clear();
        assert!(matches!(
            TriageEngine::new(catalog),
            Err(TriageError::Invariant(_))
        ));
    }

    #[test]
    fn stage_names_are_snake_case() {
        assert_eq!(AnalysisStage::EmergencyAssembled.to_string(), "emergency_assembled");
    }
}
