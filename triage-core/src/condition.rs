//! 증상 문장을 질환 규칙에 순서대로 대조해 예상 질환을 고른다.

use crate::catalog::Catalog;
use crate::model::Condition;
use crate::rules::{first_match, normalize, Rule};

/// 예상 질환과 대체 질환 목록 (주 질환 제외, 작성 순서).
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionMatch {
    pub primary: Condition,
    pub alternatives: Vec<Condition>,
}

/// 순서가 있는 질환 규칙 목록. 아무 규칙도 맞지 않으면 기본 질환을 돌려준다.
#[derive(Debug, Clone)]
pub struct ConditionMatcher {
    rules: Vec<Rule<ConditionMatch>>,
    fallback: ConditionMatch,
}

impl ConditionMatcher {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let rules = catalog
            .rules
            .iter()
            .map(|rule| {
                Rule::new(
                    rule.trigger.clone(),
                    ConditionMatch {
                        primary: rule.payload.primary.clone(),
                        alternatives: rule.payload.alternatives.clone(),
                    },
                )
            })
            .collect();

        Self {
            rules,
            fallback: ConditionMatch {
                primary: catalog.fallback.primary.clone(),
                alternatives: catalog.fallback.alternatives.clone(),
            },
        }
    }

    pub fn match_symptoms(&self, symptoms: &str) -> ConditionMatch {
        self.match_normalized(&normalize(symptoms))
    }

    pub(crate) fn match_normalized(&self, normalized: &str) -> ConditionMatch {
        first_match(&self.rules, normalized)
            .unwrap_or(&self.fallback)
            .clone()
    }

    pub fn fallback(&self) -> &Condition {
        &self.fallback.primary
    }
}
