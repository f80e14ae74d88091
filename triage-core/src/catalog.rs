//! 내장 규칙 테이블: 위험 키워드, 질환 규칙, 약품, 판매처, 응급 의료기관.
//!
//! 테이블은 엔진 생성 시 한 번 검증되고 이후에는 읽기 전용이다.

use std::collections::{BTreeMap, HashSet};

use crate::config::TriageConfig;
use crate::error::{TriageError, TriageResult};
use crate::model::{
    Condition, EmergencyFacility, LocationChannel, Medicine, OnlineStore, SalesLocation,
    StoreFront,
};
use crate::rules::{Rule, Trigger};

/// 질환 규칙이 일치했을 때의 결과 데이터.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionProfile {
    pub primary: Condition,
    pub alternatives: Vec<Condition>,
    /// `Catalog::medicines`의 키. 작성 순서가 추천 순서다.
    pub medicine_ids: Vec<String>,
    /// `Catalog::locations`의 키.
    pub location_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    pub high_risk_keywords: Vec<String>,
    pub medium_risk_keywords: Vec<String>,
    pub hospitals: Vec<EmergencyFacility>,
    pub rules: Vec<Rule<ConditionProfile>>,
    pub fallback: ConditionProfile,
    pub medicines: BTreeMap<String, Medicine>,
    pub locations: BTreeMap<String, SalesLocation>,
}

impl Catalog {
    /// 설정의 추가 키워드를 내장 목록 뒤에 붙인다.
    pub fn with_config(mut self, config: &TriageConfig) -> Self {
        self.high_risk_keywords
            .extend(config.extra_high_risk_keywords.iter().cloned());
        self.medium_risk_keywords
            .extend(config.extra_medium_risk_keywords.iter().cloned());
        self
    }

    pub fn medicine(&self, id: &str) -> TriageResult<&Medicine> {
        self.medicines
            .get(id)
            .ok_or_else(|| TriageError::Invariant(format!("약품 `{id}`이(가) 테이블에 없습니다")))
    }

    pub fn location(&self, id: &str) -> TriageResult<&SalesLocation> {
        self.locations
            .get(id)
            .ok_or_else(|| TriageError::Invariant(format!("판매처 `{id}`이(가) 테이블에 없습니다")))
    }

    /// 모든 규칙 결과 데이터 (순서대로, 마지막이 기본값).
    pub fn profiles(&self) -> impl Iterator<Item = &ConditionProfile> {
        self.rules
            .iter()
            .map(|rule| &rule.payload)
            .chain(std::iter::once(&self.fallback))
    }

    /// 테이블 작성 오류를 찾아낸다.
    pub fn validate(&self) -> TriageResult<()> {
        validate_keywords("high_risk_keywords", &self.high_risk_keywords)?;
        validate_keywords("medium_risk_keywords", &self.medium_risk_keywords)?;

        if self.hospitals.is_empty() {
            return Err(TriageError::Invariant(
                "응급 의료기관 목록이 비어 있습니다".into(),
            ));
        }

        for (id, location) in &self.locations {
            if id != &location.id {
                return Err(TriageError::Invariant(format!(
                    "판매처 키 `{id}`와 id `{}`가 다릅니다",
                    location.id
                )));
            }
        }

        let mut names = HashSet::new();
        for profile in self.profiles() {
            let name = profile.primary.name.as_str();
            if !names.insert(name) {
                return Err(TriageError::Invariant(format!("질환 `{name}`이 중복되었습니다")));
            }
            validate_profile(self, profile)?;
        }

        Ok(())
    }
}

fn validate_keywords(field: &str, keywords: &[String]) -> TriageResult<()> {
    if keywords.is_empty() {
        return Err(TriageError::Invariant(format!("{field} 목록이 비어 있습니다")));
    }
    if let Some(bad) = keywords.iter().find(|kw| Trigger::from_keyword(kw).is_none()) {
        return Err(TriageError::Invariant(format!(
            "{field}에 빈 키워드가 있습니다: `{bad}`"
        )));
    }
    Ok(())
}

fn validate_profile(catalog: &Catalog, profile: &ConditionProfile) -> TriageResult<()> {
    let name = &profile.primary.name;

    if profile.alternatives.is_empty() {
        return Err(TriageError::Invariant(format!("`{name}`에 대체 질환이 없습니다")));
    }
    if profile.alternatives.iter().any(|alt| &alt.name == name) {
        return Err(TriageError::Invariant(format!(
            "`{name}`의 대체 질환 목록에 자기 자신이 있습니다"
        )));
    }
    if profile.medicine_ids.is_empty() {
        return Err(TriageError::Invariant(format!("`{name}`에 추천 약품이 없습니다")));
    }
    for id in &profile.medicine_ids {
        catalog.medicine(id)?;
    }

    let mut seen = HashSet::new();
    for id in &profile.location_ids {
        catalog.location(id)?;
        if !seen.insert(id.as_str()) {
            return Err(TriageError::Invariant(format!(
                "`{name}`의 판매처 `{id}`가 중복되었습니다"
            )));
        }
    }
    Ok(())
}

/// 기본 제공 테이블.
pub fn builtin() -> Catalog {
    Catalog {
        high_risk_keywords: to_strings(HIGH_RISK_KEYWORDS),
        medium_risk_keywords: to_strings(MEDIUM_RISK_KEYWORDS),
        hospitals: builtin_hospitals(),
        rules: builtin_rules(),
        fallback: profile(
            condition("일반적인 컨디션 난조", "충분한 휴식과 수분 섭취가 필요해 보입니다."),
            vec![
                alternative("피로 누적", "30%", "과로나 스트레스로 인한 전신 피로"),
                alternative("수면 부족", "20%", "수면 시간 및 질 저하로 인한 컨디션 저하"),
                alternative("가벼운 탈수", "10%", "수분 섭취 부족으로 인한 무기력"),
            ],
            &["vitamin-c", "multivitamin"],
            &["pharmacy-huimang", "pharmacy-teunteun", "online-healthcare"],
        ),
        medicines: builtin_medicines(),
        locations: builtin_locations(),
    }
}

const HIGH_RISK_KEYWORDS: &[&str] = &[
    "가슴이 아프",
    "가슴이 아파",
    "가슴 아프",
    "가슴 아파",
    "가슴이 너무 아",
    "가슴이 찢어",
    "가슴 통증",
    "가슴/호흡 부위",
    "흉통",
    "심장",
    "숨을 못",
    "숨이 안",
    "숨쉬기 힘",
    "숨쉬기가 힘",
    "호흡곤란",
    "호흡 곤란",
    "의식을 잃",
    "의식이 없",
    "의식이 흐려",
    "의식불명",
    "기절",
    "실신",
    "마비",
    "경련",
    "발작",
    "말이 어눌",
    "피를 토",
    "토혈",
    "각혈",
    "피가 멈추지",
    "심한 출혈",
    "하혈",
    "심한 복통",
    "극심",
    "참을 수 없",
    "응급",
    "chest pain",
    "can't breathe",
    "cannot breathe",
    "unconscious",
    "seizure",
    "stroke",
    "severe bleeding",
    "emergency",
];

const MEDIUM_RISK_KEYWORDS: &[&str] = &[
    "고열",
    "39도",
    "40도",
    "탈수",
    "구토",
    "계속",
    "지속",
    "며칠째",
    "며칠 전부터",
    "일주일",
    "악화",
    "심해지",
    "심해져",
    "점점",
    "매우 심함",
    "가슴+답답",
    "high fever",
    "dehydrat",
    "persistent",
    "getting worse",
];

fn builtin_hospitals() -> Vec<EmergencyFacility> {
    vec![
        hospital(
            "삼성서울병원 응급의료센터",
            "1.2km",
            "서울특별시 강남구 일원로 81",
            "02-3410-2114",
            37.4881,
            127.0854,
        ),
        hospital(
            "강남세브란스병원 응급실",
            "2.1km",
            "서울특별시 강남구 언주로 211",
            "02-2019-3333",
            37.5197,
            127.0378,
        ),
        hospital(
            "서울아산병원 응급의료센터",
            "8.5km",
            "서울특별시 송파구 올림픽로43길 88",
            "02-3010-3333",
            37.5259,
            127.1058,
        ),
    ]
}

fn builtin_rules() -> Vec<Rule<ConditionProfile>> {
    let pain = || Trigger::any_of(&["아프", "아파", "아픔", "통증"]);

    vec![
        Rule::new(
            Trigger::all(vec![
                Trigger::any_of(&["배", "복통", "복부"]),
                Trigger::any(vec![pain(), Trigger::contains("복통")]),
                Trigger::contains("열"),
            ]),
            profile(
                condition("장염", "식중독이나 바이러스로 인한 장염이 의심됩니다."),
                vec![
                    alternative("식중독", "30%", "오염된 음식 섭취로 인한 급성 위장 증상"),
                    alternative("과민성 대장 증후군", "15%", "스트레스와 연관된 반복적 복통"),
                    alternative("급성 위염", "10%", "위 점막의 일시적 염증"),
                ],
                &["smecta", "tylenol-fever"],
                &[
                    "pharmacy-teunteun",
                    "pharmacy-huimang",
                    "pharmacy-geongang",
                    "online-healthcare",
                ],
            ),
        ),
        Rule::new(
            Trigger::any(vec![
                Trigger::contains("두통"),
                Trigger::all(vec![Trigger::contains("머리"), pain()]),
            ]),
            profile(
                condition("긴장성 두통", "스트레스나 피로로 인한 긴장성 두통이 의심됩니다."),
                vec![
                    alternative("편두통", "25%", "한쪽 머리에 맥박치듯 반복되는 통증"),
                    alternative("수면 부족성 두통", "15%", "수면 부족과 피로로 인한 두통"),
                    alternative("부비동염", "10%", "코 주변 염증으로 인한 두통"),
                ],
                &["tylenol-pain", "naxen"],
                &[
                    "pharmacy-teunteun",
                    "pharmacy-huimang",
                    "cu-samseong",
                    "online-healthcare",
                ],
            ),
        ),
        Rule::new(
            Trigger::any(vec![
                Trigger::any_of(&["근육통", "관절통", "결림", "염좌"]),
                Trigger::all(vec![
                    Trigger::any_of(&["허리", "무릎", "손목", "발목", "어깨"]),
                    Trigger::any(vec![pain(), Trigger::any_of(&["삐", "붓", "부었"])]),
                ]),
            ]),
            profile(
                condition("근육통", "무리한 활동이나 자세 불균형으로 인한 근육통이 의심됩니다."),
                vec![
                    alternative("근막통증 증후군", "20%", "특정 근육 부위의 지속적인 뭉침"),
                    alternative("염좌", "15%", "인대가 늘어나거나 부분적으로 손상된 상태"),
                    alternative("관절염", "10%", "관절 내부의 염증성 통증"),
                ],
                &["ketotop", "taxen"],
                &["pharmacy-onnuri", "cu-samseong", "online-healthcare"],
            ),
        ),
        Rule::new(
            Trigger::any_of(&["가려움", "가렵", "두드러기", "발진", "피부"]),
            profile(
                condition(
                    "접촉성 피부염",
                    "자극 물질이나 알레르기 반응으로 인한 피부염이 의심됩니다.",
                ),
                vec![
                    alternative("두드러기", "25%", "일시적으로 부어오르는 가려운 발진"),
                    alternative("아토피 피부염", "15%", "건조함을 동반한 만성 가려움"),
                    alternative("벌레 물림", "10%", "국소적인 붓기와 가려움"),
                ],
                &["zyrtec", "lacticare-hc"],
                &["pharmacy-coex", "pharmacy-onnuri", "online-healthcare"],
            ),
        ),
        Rule::new(
            Trigger::any_of(&["소화불량", "소화가 안", "속쓰림", "속이 쓰", "더부룩", "체한", "메스꺼"]),
            profile(
                condition("소화불량", "과식이나 스트레스로 인한 기능성 소화불량이 의심됩니다."),
                vec![
                    alternative("위식도 역류 질환", "20%", "위산 역류로 인한 가슴 쓰림"),
                    alternative("급성 위염", "15%", "위 점막의 일시적 염증"),
                    alternative("과민성 대장 증후군", "10%", "스트레스와 연관된 장 기능 이상"),
                ],
                &["festal", "gelfos"],
                &[
                    "pharmacy-onnuri",
                    "pharmacy-coex",
                    "cu-samseong",
                    "online-healthcare",
                ],
            ),
        ),
        Rule::new(
            // "손목", "발목"은 근육통 규칙이 먼저 가져간다.
            Trigger::any_of(&[
                "기침", "목이", "목 ", "목감기", "콧물", "코막힘", "인후", "가래", "cough", "throat",
            ]),
            profile(
                condition("감기", "바이러스성 상기도 감염(감기)이 의심됩니다."),
                vec![
                    alternative("인후염", "25%", "목 안쪽 점막의 염증"),
                    alternative("알레르기성 비염", "15%", "콧물과 재채기를 동반한 알레르기 반응"),
                    alternative("독감", "10%", "고열과 근육통을 동반한 인플루엔자 감염"),
                ],
                &["panpyrin", "strepsils"],
                &[
                    "pharmacy-geongang",
                    "pharmacy-teunteun",
                    "cu-samseong",
                    "online-healthcare",
                ],
            ),
        ),
    ]
}

fn builtin_medicines() -> BTreeMap<String, Medicine> {
    [
        (
            "smecta",
            medicine("스멕타", "설사 증상 완화 및 장 보호", "8,000원", &["디오스멕타이트"], &["경구 약물 흡수 저하"]),
        ),
        (
            "tylenol-fever",
            medicine("타이레놀", "발열 및 통증 완화", "6,500원", &["아세트아미노펜"], &["알코올", "와파린"]),
        ),
        (
            "tylenol-pain",
            medicine("타이레놀", "두통 및 통증 완화", "6,500원", &["아세트아미노펜"], &["알코올", "와파린"]),
        ),
        (
            "naxen",
            medicine("낙센", "염증성 두통 완화", "12,000원", &["나프록센", "아스피린 천식"], &["아스피린", "와파린"]),
        ),
        (
            "ketotop",
            medicine("케토톱", "근육통 및 관절통 국소 완화", "9,000원", &["케토프로펜"], &[]),
        ),
        (
            "taxen",
            medicine("탁센", "근육통 및 염증성 통증 완화", "6,000원", &["나프록센"], &["아스피린", "와파린"]),
        ),
        (
            "zyrtec",
            medicine("지르텍", "가려움 및 두드러기 완화", "7,000원", &["세티리진"], &["알코올", "진정제"]),
        ),
        (
            "lacticare-hc",
            medicine("락티케어 HC 로션", "국소 피부염 완화", "11,000원", &["하이드로코르티손"], &[]),
        ),
        (
            "festal",
            medicine("훼스탈", "소화불량 및 더부룩함 완화", "4,500원", &["판크레아틴"], &[]),
        ),
        (
            "gelfos",
            medicine("겔포스", "속쓰림 및 위산 과다 완화", "5,500원", &["인산알루미늄"], &["테트라사이클린"]),
        ),
        (
            "panpyrin",
            medicine("판피린", "감기 증상 종합 완화", "9,800원", &["아세트아미노펜", "카페인"], &["알코올"]),
        ),
        (
            "strepsils",
            medicine("스트렙실", "목 통증 및 염증 완화", "7,200원", &["플루르비프로펜"], &[]),
        ),
        (
            "vitamin-c",
            medicine("비타민C", "면역력 강화 및 피로 회복", "15,000원", &["아스코르브산"], &[]),
        ),
        (
            "multivitamin",
            medicine("종합비타민", "전체적인 영양 보충", "18,000원", &[], &[]),
        ),
    ]
    .into_iter()
    .map(|(id, medicine)| (id.to_string(), medicine))
    .collect()
}

fn builtin_locations() -> BTreeMap<String, SalesLocation> {
    [
        pharmacy(
            "pharmacy-onnuri",
            "삼성동 온누리약국",
            store(
                "350m",
                "서울특별시 강남구 봉은사로 524",
                37.5089,
                127.0594,
                "02-552-7890",
            ),
            "평일 09:00-22:00, 토요일 09:00-18:00",
            true,
        ),
        pharmacy(
            "pharmacy-coex",
            "코엑스몰 약국",
            store(
                "450m",
                "서울특별시 강남구 영동대로 513",
                37.5115,
                127.0590,
                "02-6002-5678",
            ),
            "매일 10:00-22:00",
            true,
        ),
        pharmacy(
            "pharmacy-teunteun",
            "튼튼약국",
            store(
                "250m",
                "서울특별시 강남구 삼성동 159-1",
                37.5088,
                127.0594,
                "02-555-1591",
            ),
            "평일 09:00-21:00, 토요일 09:00-15:00",
            true,
        ),
        pharmacy(
            "pharmacy-huimang",
            "희망약국",
            store(
                "400m",
                "서울특별시 강남구 삼성동 161-5",
                37.5095,
                127.0601,
                "02-555-1615",
            ),
            "평일 08:30-20:00",
            true,
        ),
        pharmacy(
            "pharmacy-geongang",
            "건강약국",
            store(
                "650m",
                "서울특별시 강남구 삼성동 168-2",
                37.5102,
                127.0588,
                "02-555-1682",
            ),
            "평일 09:00-19:00",
            false,
        ),
        SalesLocation {
            id: "cu-samseong".into(),
            name: "CU 삼성동점".into(),
            channel: LocationChannel::ConvenienceStore(store(
                "200m",
                "서울특별시 강남구 테헤란로 518",
                37.5075,
                127.0582,
                "02-555-1234",
            )),
            operating_hours: "24시간".into(),
            is_open: true,
            current_status: "운영 중".into(),
        },
        SalesLocation {
            id: "online-healthcare".into(),
            name: "온라인약국 헬스케어".into(),
            channel: LocationChannel::OnlineStore(OnlineStore {
                url: "https://www.healthcare.co.kr".into(),
                delivery_info: "당일배송 (오후 2시 이전 주문시)".into(),
            }),
            operating_hours: "24시간 주문 가능".into(),
            is_open: true,
            current_status: "주문 가능".into(),
        },
    ]
    .into_iter()
    .map(|location| (location.id.clone(), location))
    .collect()
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

fn condition(name: &str, description: &str) -> Condition {
    Condition {
        name: name.into(),
        description: description.into(),
        probability: None,
    }
}

fn alternative(name: &str, probability: &str, description: &str) -> Condition {
    Condition {
        name: name.into(),
        description: description.into(),
        probability: Some(probability.into()),
    }
}

fn profile(
    primary: Condition,
    alternatives: Vec<Condition>,
    medicine_ids: &[&str],
    location_ids: &[&str],
) -> ConditionProfile {
    ConditionProfile {
        primary,
        alternatives,
        medicine_ids: to_strings(medicine_ids),
        location_ids: to_strings(location_ids),
    }
}

fn medicine(
    name: &str,
    effect: &str,
    price: &str,
    contraindications: &[&str],
    interactions: &[&str],
) -> Medicine {
    Medicine {
        name: name.into(),
        effect: effect.into(),
        price: price.into(),
        contraindications: to_strings(contraindications),
        interactions: to_strings(interactions),
    }
}

fn hospital(
    name: &str,
    distance: &str,
    address: &str,
    phone: &str,
    lat: f64,
    lng: f64,
) -> EmergencyFacility {
    EmergencyFacility {
        name: name.into(),
        distance: distance.into(),
        address: address.into(),
        phone: phone.into(),
        lat,
        lng,
    }
}

fn store(distance: &str, address: &str, lat: f64, lng: f64, phone: &str) -> StoreFront {
    StoreFront {
        distance: distance.into(),
        address: address.into(),
        lat,
        lng,
        phone: phone.into(),
    }
}

fn pharmacy(
    id: &str,
    name: &str,
    front: StoreFront,
    operating_hours: &str,
    is_open: bool,
) -> SalesLocation {
    let status = if is_open { "운영 중" } else { "영업 종료" };
    SalesLocation {
        id: id.into(),
        name: name.into(),
        channel: LocationChannel::Pharmacy(front),
        operating_hours: operating_hours.into(),
        is_open,
        current_status: status.into(),
    }
}
