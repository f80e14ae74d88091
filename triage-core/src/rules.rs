//! 증상 문장에 대한 선언적 규칙 평가.

/// 키워드 안에서 "모두 포함" 조건을 나타내는 구분자 (`가슴+아프`).
pub const KEYWORD_CONJUNCTION: char = '+';

/// 정규화된 증상 문장에 대한 부분 문자열 조건.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    Contains(String),
    All(Vec<Trigger>),
    Any(Vec<Trigger>),
}

impl Trigger {
    pub fn contains(term: &str) -> Self {
        Trigger::Contains(normalize(term))
    }

    pub fn any_of(terms: &[&str]) -> Self {
        Trigger::Any(terms.iter().map(|term| Trigger::contains(term)).collect())
    }

    pub fn all(triggers: Vec<Trigger>) -> Self {
        Trigger::All(triggers)
    }

    pub fn any(triggers: Vec<Trigger>) -> Self {
        Trigger::Any(triggers)
    }

    /// 설정 파일의 키워드 한 줄을 조건으로 바꾼다.
    ///
    /// `a+b`는 a와 b가 모두 있어야 참이다. 빈 조각이 있으면 `None`.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let parts: Vec<String> = keyword.split(KEYWORD_CONJUNCTION).map(normalize).collect();
        if parts.iter().any(String::is_empty) {
            return None;
        }

        let mut triggers: Vec<Trigger> = parts.into_iter().map(Trigger::Contains).collect();
        if triggers.len() == 1 {
            triggers.pop()
        } else {
            Some(Trigger::All(triggers))
        }
    }

    /// `normalized`는 [`normalize`]를 거친 문자열이어야 한다.
    pub fn matches(&self, normalized: &str) -> bool {
        match self {
            Trigger::Contains(term) => !term.is_empty() && normalized.contains(term.as_str()),
            Trigger::All(triggers) => {
                !triggers.is_empty() && triggers.iter().all(|t| t.matches(normalized))
            }
            Trigger::Any(triggers) => triggers.iter().any(|t| t.matches(normalized)),
        }
    }
}

/// 조건과 결과 데이터의 쌍.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule<P> {
    pub trigger: Trigger,
    pub payload: P,
}

impl<P> Rule<P> {
    pub fn new(trigger: Trigger, payload: P) -> Self {
        Self { trigger, payload }
    }
}

/// 순서대로 평가해 처음 일치한 규칙의 결과를 돌려준다.
pub fn first_match<'a, P>(rules: &'a [Rule<P>], normalized: &str) -> Option<&'a P> {
    rules
        .iter()
        .find(|rule| rule.trigger.matches(normalized))
        .map(|rule| &rule.payload)
}

/// 대소문자를 접고 앞뒤 공백을 제거한다.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conjunction_keyword_requires_every_part() {
        let trigger = Trigger::from_keyword("가슴+아프").unwrap();
        assert!(trigger.matches("가슴이 너무 아프고"));
        assert!(!trigger.matches("가슴이 답답해"));
        assert!(!trigger.matches("머리가 아프다"));
    }

    #[test]
    fn blank_keyword_parts_are_rejected() {
        assert!(Trigger::from_keyword("").is_none());
        assert!(Trigger::from_keyword("가슴+").is_none());
        assert!(Trigger::from_keyword("  ").is_none());
    }

    #[test]
    fn keywords_are_case_folded() {
        let trigger = Trigger::from_keyword("Chest Pain").unwrap();
        assert!(trigger.matches(&normalize("Sudden CHEST PAIN at night")));
    }

    #[test]
    fn first_matching_rule_wins() {
        let rules = vec![
            Rule::new(Trigger::any_of(&["기침"]), "cold"),
            Rule::new(Trigger::any_of(&["기침", "머리"]), "other"),
        ];
        assert_eq!(first_match(&rules, "기침이 나고 머리가 아파"), Some(&"cold"));
        assert_eq!(first_match(&rules, "머리"), Some(&"other"));
        assert_eq!(first_match(&rules, ""), None);
    }

    #[test]
    fn empty_conjunction_never_matches() {
        assert!(!Trigger::all(Vec::new()).matches("anything"));
        assert!(!Trigger::any(Vec::new()).matches("anything"));
    }
}
