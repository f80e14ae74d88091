use triage_core::UserProfile;

const RESPONSE_SCHEMA: &str = r#"{
  "riskLevel": "high" | "medium" | "low",
  "riskTitle": "위험도 제목",
  "riskDescription": "위험도 설명",
  "riskAction": "권장 조치사항",
  "disease": "주요 예상 질병명",
  "diseaseDescription": "질병 설명",
  "alternativeDiseases": [
    {
      "name": "질병명",
      "probability": "확률 (예: 30%)",
      "description": "간단한 설명"
    }
  ],
  "medicines": [
    {
      "name": "약물명",
      "effect": "효과",
      "price": "가격대",
      "contraindications": ["금기사항1", "금기사항2"]
    }
  ],
  "personalizedWarnings": ["개인 맞춤 경고사항"],
  "needsEmergency": true | false
}"#;

const RESPONSE_RULES: &str = "\
1. 심각한 증상(심장마비, 뇌졸중, 심한 복통 등)은 riskLevel을 \"high\"로 설정
2. 일반의약품만 추천 (처방전 필요 없는 약물)
3. 사용자 프로필의 알레르기, 기저질환, 복용약물을 고려하여 personalizedWarnings 생성
4. needsEmergency가 true면 응급의료기관 정보가 필요함을 의미
5. 한국어로 응답
6. JSON 형식만 반환 (다른 텍스트 포함하지 말 것)";

/// 증상과 프로필로 모델 프롬프트를 만든다. 비어 있는 프로필 항목은 "없음"으로 적는다.
pub fn build_prompt(symptoms: &str, profile: &UserProfile) -> String {
    format!(
        "당신은 의료 전문 AI입니다. 다음 증상을 분석하고 JSON 형식으로 응답해주세요.\n\n\
         증상: \"{symptoms}\"\n\n\
         사용자 프로필:\n\
         - 키: {height}\n\
         - 몸무게: {weight}\n\
         - 알레르기: {allergies}\n\
         - 기저질환: {conditions}\n\
         - 복용 중인 약물: {medications}\n\n\
         다음 JSON 구조로 정확히 응답해주세요:\n\n\
         {RESPONSE_SCHEMA}\n\n\
         규칙:\n\
         {RESPONSE_RULES}\n",
        symptoms = symptoms.trim(),
        height = measurement(profile.height, "cm"),
        weight = measurement(profile.weight, "kg"),
        allergies = joined(&profile.allergies),
        conditions = joined(&profile.conditions),
        medications = joined(&profile.medications),
    )
}

fn measurement(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{v}{unit}"),
        None => "미제공".to_string(),
    }
}

fn joined(items: &[String]) -> String {
    if items.is_empty() {
        "없음".to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_profile_is_rendered_as_none() {
        let prompt = build_prompt("  머리가 아프다 ", &UserProfile::default());
        assert!(prompt.contains("증상: \"머리가 아프다\""));
        assert!(prompt.contains("- 키: 미제공"));
        assert!(prompt.contains("- 알레르기: 없음"));
        assert!(prompt.contains("- 복용 중인 약물: 없음"));
        assert!(prompt.contains("\"needsEmergency\": true | false"));
    }

    #[test]
    fn profile_block_is_one_line_per_field() {
        let prompt = build_prompt("기침", &UserProfile::default());
        let lines: Vec<&str> = prompt
            .lines()
            .skip_while(|line| *line != "사용자 프로필:")
            .skip(1)
            .take_while(|line| !line.is_empty())
            .collect();
        assert_eq!(
            lines,
            vec![
                "- 키: 미제공",
                "- 몸무게: 미제공",
                "- 알레르기: 없음",
                "- 기저질환: 없음",
                "- 복용 중인 약물: 없음",
            ]
        );
        assert!(prompt.ends_with("다른 텍스트 포함하지 말 것)\n"));
    }

    #[test]
    fn profile_fields_are_listed() {
        let profile = UserProfile {
            height: Some(168.0),
            weight: Some(61.5),
            allergies: vec!["아세트아미노펜".into(), "페니실린".into()],
            conditions: vec!["천식".into()],
            medications: Vec::new(),
        };
        let prompt = build_prompt("기침", &profile);
        assert!(prompt.contains("- 키: 168cm"));
        assert!(prompt.contains("- 몸무게: 61.5kg"));
        assert!(prompt.contains("- 알레르기: 아세트아미노펜, 페니실린"));
        assert!(prompt.contains("- 기저질환: 천식"));
    }
}
