//! 체크리스트/대화형 입력을 분석용 증상 문장으로 조합한다.

use serde::{Deserialize, Serialize};

use crate::error::{TriageError, TriageResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymptomCategory {
    pub id: &'static str,
    pub name: &'static str,
    pub symptoms: &'static [&'static str],
}

pub const SYMPTOM_CATEGORIES: &[SymptomCategory] = &[
    SymptomCategory {
        id: "respiratory",
        name: "호흡기",
        symptoms: &["기침", "콧물", "코막힘", "가래", "인후통", "목 따가움", "목 쉼", "가슴 답답함"],
    },
    SymptomCategory {
        id: "digestive",
        name: "소화기",
        symptoms: &["복통", "설사", "변비", "메스꺼움", "구토", "소화불량", "속쓰림", "식욕부진"],
    },
    SymptomCategory {
        id: "headache",
        name: "두통/발열",
        symptoms: &["두통", "편두통", "발열", "오한", "어지러움", "현기증", "목 경직", "눈 피로"],
    },
    SymptomCategory {
        id: "musculoskeletal",
        name: "근육/관절",
        symptoms: &["근육통", "관절통", "어깨 결림", "목 결림", "허리 통증", "무릎 통증", "손목 통증", "발목 통증"],
    },
    SymptomCategory {
        id: "skin",
        name: "피부",
        symptoms: &["발진", "가려움", "두드러기", "건조함", "붓기", "상처", "멍", "화상"],
    },
    SymptomCategory {
        id: "general",
        name: "전신증상",
        symptoms: &["피로감", "무기력", "불면증", "식은땀", "체중감소", "체중증가", "갈증", "빈뇨"],
    },
];

pub fn category(id: &str) -> Option<&'static SymptomCategory> {
    SYMPTOM_CATEGORIES.iter().find(|category| category.id == id)
}

/// 체크리스트에서 고른 증상들.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChecklistSelection {
    selected: Vec<(String, String)>,
}

impl ChecklistSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// 선택을 뒤집는다. 선택된 상태가 되면 `true`.
    pub fn toggle(&mut self, category_id: &str, symptom: &str) -> TriageResult<bool> {
        let known = category(category_id)
            .is_some_and(|category| category.symptoms.contains(&symptom));
        if !known {
            return Err(TriageError::validation(
                "checklist",
                format!("알 수 없는 증상 항목입니다: {category_id}/{symptom}"),
            ));
        }

        let entry = (category_id.to_string(), symptom.to_string());
        if let Some(index) = self.selected.iter().position(|item| item == &entry) {
            self.selected.remove(index);
            Ok(false)
        } else {
            self.selected.push(entry);
            Ok(true)
        }
    }

    pub fn count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_selected(&self, category_id: &str, symptom: &str) -> bool {
        self.selected
            .iter()
            .any(|(c, s)| c == category_id && s == symptom)
    }

    /// 분류표 순서대로 증상 문장을 만든다. 선택이 없으면 `None`.
    ///
    /// 분류 이름("두통/발열" 등)은 규칙 일치를 왜곡하므로 넣지 않는다.
    pub fn compose(&self) -> Option<String> {
        let symptoms: Vec<&str> = SYMPTOM_CATEGORIES
            .iter()
            .flat_map(|category| {
                category
                    .symptoms
                    .iter()
                    .filter(move |symptom| self.is_selected(category.id, symptom))
                    .copied()
            })
            .collect();

        if symptoms.is_empty() {
            None
        } else {
            Some(format!("다음 증상들이 있습니다: {}", symptoms.join(", ")))
        }
    }
}

/// 대화형 입력의 질문 단계.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IntakeStep {
    MainSymptom,
    Duration,
    Severity,
    AdditionalSymptoms,
    Confirm,
}

impl IntakeStep {
    pub fn question(self) -> &'static str {
        match self {
            IntakeStep::MainSymptom => "오늘 어디가 가장 불편하신가요?",
            IntakeStep::Duration => "언제부터 이런 증상이 있으셨나요?",
            IntakeStep::Severity => "증상의 정도는 어떠신가요?",
            IntakeStep::AdditionalSymptoms => {
                "다른 동반 증상이 있으신가요? (해당하는 것을 모두 말씀해주세요)"
            }
            IntakeStep::Confirm => "이 내용으로 분석을 시작할까요?",
        }
    }

    /// 보기 목록. 보기 밖의 자유 입력도 받는다 (확인 단계 제외).
    pub fn options(self) -> &'static [&'static str] {
        match self {
            IntakeStep::MainSymptom => &["머리", "목/인후", "가슴/호흡", "배/소화기", "기타 부위"],
            IntakeStep::Duration => &["방금 전부터", "몇 시간 전부터", "어제부터", "며칠 전부터", "일주일 이상"],
            IntakeStep::Severity => &["매우 심함", "심함", "보통", "가벼움", "매우 가벼움"],
            IntakeStep::AdditionalSymptoms => &["발열", "오한", "메스꺼움", "어지러움", "피로감", "없음"],
            IntakeStep::Confirm => &[CONFIRM_YES, CONFIRM_RETRY],
        }
    }
}

pub const CONFIRM_YES: &str = "네, 분석 시작";
pub const CONFIRM_RETRY: &str = "다시 입력하기";
const NONE_OPTION: &str = "없음";

/// 확인 단계의 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeOutcome {
    Next(IntakeStep),
    Completed(String),
    Restarted,
}

/// 질문-응답으로 증상 정보를 모은다.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GuidedIntake {
    step: IntakeStep,
    main_symptom: String,
    duration: String,
    severity: String,
    additional_symptoms: Vec<String>,
}

impl Default for GuidedIntake {
    fn default() -> Self {
        Self {
            step: IntakeStep::MainSymptom,
            main_symptom: String::new(),
            duration: String::new(),
            severity: String::new(),
            additional_symptoms: Vec::new(),
        }
    }
}

impl GuidedIntake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> IntakeStep {
        self.step
    }

    /// 현재 단계에 답한다. 동반 증상은 쉼표로 여러 개를 줄 수 있다.
    pub fn answer(&mut self, answer: &str) -> TriageResult<IntakeOutcome> {
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(TriageError::validation("answer", "응답을 입력해 주세요"));
        }

        match self.step {
            IntakeStep::MainSymptom => {
                self.main_symptom = answer.to_string();
                self.step = IntakeStep::Duration;
            }
            IntakeStep::Duration => {
                self.duration = answer.to_string();
                self.step = IntakeStep::Severity;
            }
            IntakeStep::Severity => {
                self.severity = answer.to_string();
                self.step = IntakeStep::AdditionalSymptoms;
            }
            IntakeStep::AdditionalSymptoms => {
                self.additional_symptoms.clear();
                for item in answer.split(',').map(str::trim) {
                    if item == NONE_OPTION {
                        self.additional_symptoms.clear();
                        break;
                    }
                    if !item.is_empty() && !self.additional_symptoms.iter().any(|s| s == item) {
                        self.additional_symptoms.push(item.to_string());
                    }
                }
                self.step = IntakeStep::Confirm;
            }
            IntakeStep::Confirm => {
                return match answer {
                    CONFIRM_YES => Ok(IntakeOutcome::Completed(self.compose())),
                    CONFIRM_RETRY => {
                        *self = Self::default();
                        Ok(IntakeOutcome::Restarted)
                    }
                    other => Err(TriageError::validation(
                        "answer",
                        format!("확인 단계에서는 '{CONFIRM_YES}' 또는 '{CONFIRM_RETRY}'만 가능합니다: {other}"),
                    )),
                };
            }
        }

        Ok(IntakeOutcome::Next(self.step))
    }

    fn additional_text(&self) -> String {
        if self.additional_symptoms.is_empty() {
            NONE_OPTION.to_string()
        } else {
            self.additional_symptoms.join(", ")
        }
    }

    /// 확인 단계에서 보여 줄 요약.
    pub fn summary(&self) -> String {
        format!(
            "주요 증상: {} 부위 불편감\n지속 기간: {}\n심각도: {}\n동반 증상: {}",
            self.main_symptom,
            self.duration,
            self.severity,
            self.additional_text()
        )
    }

    /// 분석에 넘길 증상 문장.
    pub fn compose(&self) -> String {
        format!(
            "{} 부위가 {} {} 수준으로 아픔. 동반 증상: {}",
            self.main_symptom,
            self.duration,
            self.severity,
            self.additional_text()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checklist_toggle_and_compose_in_table_order() {
        let mut selection = ChecklistSelection::new();
        assert!(selection.toggle("digestive", "설사").unwrap());
        assert!(selection.toggle("respiratory", "기침").unwrap());
        assert!(selection.toggle("respiratory", "콧물").unwrap());
        assert!(!selection.toggle("respiratory", "콧물").unwrap());

        assert_eq!(selection.count(), 2);
        assert_eq!(
            selection.compose().as_deref(),
            Some("다음 증상들이 있습니다: 기침, 설사")
        );
    }

    #[test]
    fn checklist_rejects_unknown_items() {
        let mut selection = ChecklistSelection::new();
        assert!(selection.toggle("skin", "기침").is_err());
        assert!(selection.toggle("nope", "기침").is_err());
        assert_eq!(selection.compose(), None);
    }

    #[test]
    fn guided_intake_walks_through_steps() {
        let mut intake = GuidedIntake::new();
        assert_eq!(intake.answer("배/소화기").unwrap(), IntakeOutcome::Next(IntakeStep::Duration));
        intake.answer("어제부터").unwrap();
        intake.answer("보통").unwrap();
        assert_eq!(
            intake.answer("발열, 메스꺼움").unwrap(),
            IntakeOutcome::Next(IntakeStep::Confirm)
        );

        let outcome = intake.answer(CONFIRM_YES).unwrap();
        assert_eq!(
            outcome,
            IntakeOutcome::Completed(
                "배/소화기 부위가 어제부터 보통 수준으로 아픔. 동반 증상: 발열, 메스꺼움".into()
            )
        );
    }

    #[test]
    fn none_option_clears_additional_symptoms() {
        let mut intake = GuidedIntake::new();
        for answer in ["머리", "방금 전부터", "가벼움", "없음"] {
            intake.answer(answer).unwrap();
        }
        assert!(intake.summary().ends_with("동반 증상: 없음"));
    }

    #[test]
    fn retry_restarts_from_first_question() {
        let mut intake = GuidedIntake::new();
        for answer in ["머리", "방금 전부터", "가벼움", "없음"] {
            intake.answer(answer).unwrap();
        }
        assert_eq!(intake.answer(CONFIRM_RETRY).unwrap(), IntakeOutcome::Restarted);
        assert_eq!(intake, GuidedIntake::new());
        assert!(intake.answer("   ").is_err());
    }
}
