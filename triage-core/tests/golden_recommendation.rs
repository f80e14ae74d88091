use std::fs;

use serde_json::Value;
use triage_core::{analyze, AnalysisRequest, TriageEngine, UserProfile};

fn fixture_path(name: &str) -> String {
    format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn read_fixture(name: &str) -> Value {
    let raw = fs::read_to_string(fixture_path(name)).expect("픽스처를 읽지 못했습니다");
    serde_json::from_str(&raw).expect("픽스처 JSON이 올바르지 않습니다")
}

#[test]
fn headache_with_acetaminophen_allergy_matches_golden() {
    let raw = fs::read_to_string(fixture_path("headache_request.json"))
        .expect("요청 픽스처를 읽지 못했습니다");
    let request = AnalysisRequest::from_json_str(&raw).expect("요청 형식 오류");

    let engine = TriageEngine::builtin().expect("내장 테이블 오류");
    let recommendation = analyze(&engine, &request).expect("분석 실패");

    let actual = serde_json::to_value(recommendation).expect("직렬화 실패");
    assert_eq!(actual, read_fixture("headache_recommendation.json"));
}

#[test]
fn chest_pain_emergency_matches_golden() {
    let engine = TriageEngine::builtin().expect("내장 테이블 오류");
    let recommendation = engine.assemble("가슴이 너무 아프고 숨을 못 쉬겠어", &UserProfile::default());

    let actual = serde_json::to_value(recommendation).expect("직렬화 실패");
    assert_eq!(actual, read_fixture("chest_pain_recommendation.json"));
}

#[test]
fn golden_output_parses_back_into_model() {
    let value = read_fixture("headache_recommendation.json");
    let parsed: triage_core::MedicalRecommendation =
        serde_json::from_value(value.clone()).expect("모델로 역직렬화 실패");
    assert_eq!(serde_json::to_value(parsed).unwrap(), value);
}
