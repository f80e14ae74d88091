//! 프레임워크 중립적인 WASM <-> JavaScript 브리지.

use serde::{Deserialize, Serialize};
use serde_wasm_bindgen::{from_value, to_value};
use triage_core::intake::{ChecklistSelection, SYMPTOM_CATEGORIES};
use triage_core::{analyze, AnalysisRequest, MedicalRecommendation, TriageConfig, TriageEngine};
use wasm_bindgen::prelude::*;

#[derive(Deserialize, Default)]
struct JsTriageConfig {
    #[serde(default, rename = "extraHighRiskKeywords")]
    extra_high_risk_keywords: Option<Vec<String>>,
    #[serde(default, rename = "extraMediumRiskKeywords")]
    extra_medium_risk_keywords: Option<Vec<String>>,
}

// 브라우저에서는 결정적 분석만 쓴다.
impl From<JsTriageConfig> for TriageConfig {
    fn from(cfg: JsTriageConfig) -> Self {
        let mut base = TriageConfig::default();
        if let Some(keywords) = cfg.extra_high_risk_keywords {
            base.extra_high_risk_keywords = keywords;
        }
        if let Some(keywords) = cfg.extra_medium_risk_keywords {
            base.extra_medium_risk_keywords = keywords;
        }
        base
    }
}

#[derive(Deserialize)]
struct JsChecklistItem {
    category: String,
    symptom: String,
}

#[derive(Serialize)]
struct JsSymptomCategory {
    id: &'static str,
    name: &'static str,
    symptoms: &'static [&'static str],
}

#[wasm_bindgen]
pub fn analyze_symptoms(request: JsValue, config: Option<JsValue>) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let request_value = from_value::<serde_json::Value>(request)
        .map_err(|err| JsValue::from_str(&format!("요청 JSON을 읽을 수 없습니다: {err}")))?;

    let cfg = match config {
        Some(js_cfg) => from_value::<JsTriageConfig>(js_cfg)
            .map_err(|err| JsValue::from_str(&format!("설정을 읽을 수 없습니다: {err}")))?,
        None => JsTriageConfig::default(),
    };

    let recommendation =
        analyze_value(request_value, cfg.into()).map_err(|err| JsValue::from_str(&err))?;

    to_value(&recommendation)
        .map_err(|err| JsValue::from_str(&format!("결과를 직렬화할 수 없습니다: {err}")))
}

/// 선택한 체크리스트 항목(`[{ category, symptom }]`)으로 증상 문장을 만든다. 선택이 없으면 `null`.
#[wasm_bindgen]
pub fn compose_checklist(selected: JsValue) -> Result<JsValue, JsValue> {
    let items: Vec<JsChecklistItem> = from_value(selected)
        .map_err(|err| JsValue::from_str(&format!("체크리스트를 읽을 수 없습니다: {err}")))?;
    let text = compose_items(&items).map_err(|err| JsValue::from_str(&err))?;
    Ok(text.map_or(JsValue::NULL, |text| JsValue::from_str(&text)))
}

#[wasm_bindgen]
pub fn symptom_categories() -> Result<JsValue, JsValue> {
    let categories: Vec<JsSymptomCategory> = SYMPTOM_CATEGORIES
        .iter()
        .map(|category| JsSymptomCategory {
            id: category.id,
            name: category.name,
            symptoms: category.symptoms,
        })
        .collect();
    to_value(&categories)
        .map_err(|err| JsValue::from_str(&format!("분류표를 직렬화할 수 없습니다: {err}")))
}

fn analyze_value(
    request: serde_json::Value,
    config: TriageConfig,
) -> Result<MedicalRecommendation, String> {
    let request = AnalysisRequest::from_json_value(request).map_err(format_triage_error)?;
    let engine = TriageEngine::from_config(&config).map_err(format_triage_error)?;
    analyze(&engine, &request).map_err(format_triage_error)
}

fn compose_items(items: &[JsChecklistItem]) -> Result<Option<String>, String> {
    let mut selection = ChecklistSelection::new();
    for item in items {
        if !selection.is_selected(&item.category, &item.symptom) {
            selection
                .toggle(&item.category, &item.symptom)
                .map_err(format_triage_error)?;
        }
    }
    Ok(selection.compose())
}

fn format_triage_error(err: triage_core::TriageError) -> String {
    format!("증상 분석 오류: {err}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn analyze_value_runs_the_engine() {
        let rec = analyze_value(
            json!({ "symptoms": "배가 아프고 열이 나" }),
            TriageConfig::default(),
        )
        .unwrap();
        assert_eq!(rec.disease.as_deref(), Some("장염"));
    }

    #[test]
    fn invalid_request_reports_field() {
        let err = analyze_value(json!({ "symptoms": "" }), TriageConfig::default()).unwrap_err();
        assert!(err.contains("symptoms"), "{err}");
    }

    #[test]
    fn js_config_extends_keywords() {
        let cfg: JsTriageConfig =
            serde_json::from_value(json!({ "extraHighRiskKeywords": ["아나필락시스"] })).unwrap();
        let rec = analyze_value(json!({ "symptoms": "아나필락시스 의심" }), cfg.into()).unwrap();
        assert!(rec.is_emergency());
    }

    #[test]
    fn checklist_items_compose_once_each() {
        let items = vec![
            JsChecklistItem { category: "digestive".into(), symptom: "설사".into() },
            JsChecklistItem { category: "digestive".into(), symptom: "설사".into() },
        ];
        assert_eq!(
            compose_items(&items).unwrap().as_deref(),
            Some("다음 증상들이 있습니다: 설사")
        );
        assert_eq!(compose_items(&[]).unwrap(), None);
    }
}
