//! 질환별 후보 약품 조회와 알레르기 금기 필터링.

use std::collections::HashMap;

use crate::catalog::Catalog;
use crate::error::TriageResult;
use crate::model::{Condition, Medicine, UserProfile};

pub const ALLERGY_EXCLUSION_WARNING: &str =
    "프로필에 등록된 알레르기 정보에 따라 일부 약물이 추천 목록에서 제외되었습니다.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MedicineSelection {
    pub medicines: Vec<Medicine>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct MedicineSelector {
    candidates: HashMap<String, Vec<Medicine>>,
}

impl MedicineSelector {
    pub fn from_catalog(catalog: &Catalog) -> TriageResult<Self> {
        let mut candidates = HashMap::new();
        for profile in catalog.profiles() {
            let medicines = profile
                .medicine_ids
                .iter()
                .map(|id| catalog.medicine(id).cloned())
                .collect::<TriageResult<Vec<_>>>()?;
            candidates.insert(profile.primary.name.clone(), medicines);
        }
        Ok(Self { candidates })
    }

    /// 질환에 연결된 후보 약품. 테이블에 없는 질환이면 빈 목록.
    pub fn candidates(&self, condition: &Condition) -> &[Medicine] {
        self.candidates
            .get(&condition.name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn select(&self, condition: &Condition, profile: &UserProfile) -> MedicineSelection {
        filter_contraindicated(self.candidates(condition), profile)
    }
}

/// 알레르기와 금기 태그가 겹치는 약을 제거한다.
///
/// 하나라도 제거되면 경고를 정확히 한 줄 추가한다. 남은 약의 순서는 유지된다.
pub fn filter_contraindicated(candidates: &[Medicine], profile: &UserProfile) -> MedicineSelection {
    let allergies: Vec<String> = profile
        .allergies
        .iter()
        .map(|allergy| allergy.trim().to_lowercase())
        .filter(|allergy| !allergy.is_empty())
        .collect();

    let medicines: Vec<Medicine> = candidates
        .iter()
        .filter(|medicine| !is_contraindicated(medicine, &allergies))
        .cloned()
        .collect();

    let mut warnings = Vec::new();
    if medicines.len() < candidates.len() {
        tracing::debug!(
            removed = candidates.len() - medicines.len(),
            "allergy filter excluded medicines"
        );
        warnings.push(ALLERGY_EXCLUSION_WARNING.to_string());
    }

    MedicineSelection {
        medicines,
        warnings,
    }
}

/// `allergies`는 소문자로 정규화되고 비어 있지 않아야 한다.
fn is_contraindicated(medicine: &Medicine, allergies: &[String]) -> bool {
    medicine.contraindications.iter().any(|tag| {
        let tag = tag.trim().to_lowercase();
        !tag.is_empty()
            && allergies
                .iter()
                .any(|allergy| tag.contains(allergy.as_str()) || allergy.contains(tag.as_str()))
    })
}
