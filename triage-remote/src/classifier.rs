use std::sync::Arc;

use triage_core::{
    filter_contraindicated, ClassifierKind, Classifier, Condition, MedicalRecommendation,
    RiskAssessment, RiskLevel, TriageConfig, TriageEngine, TriageResult, UserProfile,
};

use crate::config::RemoteModelConfig;
use crate::error::RemoteError;
use crate::gemini::{GeminiClient, GenerativeModel};
use crate::prompt::build_prompt;
use crate::response::{parse_model_response, RemoteAnalysis};

/// 생성형 모델로 분석하는 분류기.
///
/// 모델 결과도 결정적 엔진과 같은 규칙을 따른다. 고위험이면 응급 형태로만 답하고,
/// 약 목록은 알레르기 필터를, 판매처는 엔진의 판매처 조회를 거친다. 위험도는 모델과
/// 키워드 분류 중 높은 쪽을 쓴다.
pub struct RemoteModelClassifier<M> {
    model: M,
    engine: Arc<TriageEngine>,
    fallback: bool,
}

impl<M: GenerativeModel> RemoteModelClassifier<M> {
    pub fn new(model: M, engine: Arc<TriageEngine>) -> Self {
        Self {
            model,
            engine,
            fallback: true,
        }
    }

    /// 모델 실패 시 결정적 분석으로 대체하지 않고 오류를 돌려준다.
    pub fn without_fallback(mut self) -> Self {
        self.fallback = false;
        self
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// 모델을 한 번 호출해 결과를 만든다. 대체 분석은 하지 않는다.
    pub fn consult(
        &self,
        symptoms: &str,
        profile: &UserProfile,
    ) -> Result<MedicalRecommendation, RemoteError> {
        let prompt = build_prompt(symptoms, profile);
        let generated = self.model.generate(&prompt)?;
        let analysis = parse_model_response(&generated)?;
        Ok(self.assemble(symptoms, profile, analysis))
    }

    fn assemble(
        &self,
        symptoms: &str,
        profile: &UserProfile,
        analysis: RemoteAnalysis,
    ) -> MedicalRecommendation {
        let keyword_level = self.engine.risk_classifier().classify(symptoms).level;
        let model_level = analysis.effective_level();
        let level = model_level.max(keyword_level);
        tracing::debug!(
            model = model_level.as_str(),
            keywords = keyword_level.as_str(),
            "remote risk level resolved"
        );

        let risk = self.assessment(level, model_level == level, &analysis);
        if risk.is_emergency() {
            tracing::info!("high risk from remote analysis, skipping recommendation stages");
            return MedicalRecommendation::emergency(symptoms, risk);
        }

        // 고위험이 아니면 parse_model_response가 질환명을 보장한다.
        let primary = Condition {
            name: analysis.disease.unwrap_or_default(),
            description: analysis.disease_description.unwrap_or_default(),
            probability: None,
        };

        let selection = filter_contraindicated(&analysis.medicines, profile);
        let mut warnings = analysis.warnings;
        for warning in selection.warnings {
            if !warnings.contains(&warning) {
                warnings.push(warning);
            }
        }

        let locations = self.engine.location_provider().locate(&primary);
        MedicalRecommendation::full(
            symptoms,
            risk,
            primary,
            analysis.alternatives,
            selection.medicines,
            warnings,
            locations,
        )
    }

    /// 모델이 정한 단계라면 모델 문구를, 키워드로 올라간 단계라면 고정 문구를 쓴다.
    fn assessment(
        &self,
        level: RiskLevel,
        from_model: bool,
        analysis: &RemoteAnalysis,
    ) -> RiskAssessment {
        let mut risk = self.engine.risk_classifier().guidance(level);
        if from_model {
            if let Some(title) = &analysis.title {
                risk.title = title.clone();
            }
            if let Some(description) = &analysis.description {
                risk.description = description.clone();
            }
            if let Some(action) = &analysis.action {
                risk.action = action.clone();
            }
        }
        risk
    }
}

impl<M: GenerativeModel> Classifier for RemoteModelClassifier<M> {
    fn recommend(
        &self,
        symptoms: &str,
        profile: &UserProfile,
    ) -> TriageResult<MedicalRecommendation> {
        match self.consult(symptoms, profile) {
            Ok(recommendation) => Ok(recommendation),
            Err(err) if self.fallback => {
                tracing::warn!(error = %err, "remote model failed, using deterministic analysis");
                Ok(self.engine.assemble(symptoms, profile))
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// 설정에 맞는 분석 방식을 만든다.
pub fn classifier_from_config(
    config: &TriageConfig,
    remote: &RemoteModelConfig,
    engine: Arc<TriageEngine>,
) -> Result<Box<dyn Classifier>, RemoteError> {
    match config.classifier {
        ClassifierKind::Deterministic => Ok(Box::new(engine)),
        ClassifierKind::RemoteModel => {
            let client = GeminiClient::new(remote)?;
            tracing::debug!(model = %remote.model, timeout_ms = remote.timeout_ms, "remote classifier selected");
            Ok(Box::new(RemoteModelClassifier::new(client, engine)))
        }
    }
}
