//! 프로필 편집과 저장소 인터페이스.
//!
//! 코어는 프로필을 직접 저장하지 않는다. 세션 계층이 [`ProfileStore`] 구현을 골라
//! 불러오고, 분석에는 불변 참조만 넘긴다.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::{TriageError, TriageResult};
use crate::model::UserProfile;

/// 프로필의 문자열 목록 필드.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProfileList {
    Allergies,
    Conditions,
    Medications,
}

impl UserProfile {
    fn list_mut(&mut self, list: ProfileList) -> &mut Vec<String> {
        match list {
            ProfileList::Allergies => &mut self.allergies,
            ProfileList::Conditions => &mut self.conditions,
            ProfileList::Medications => &mut self.medications,
        }
    }

    pub fn list(&self, list: ProfileList) -> &[String] {
        match list {
            ProfileList::Allergies => &self.allergies,
            ProfileList::Conditions => &self.conditions,
            ProfileList::Medications => &self.medications,
        }
    }

    /// 앞뒤 공백을 제거해 추가한다. 빈 값이나 이미 있는 값(대소문자 무시)이면 `false`.
    pub fn add(&mut self, list: ProfileList, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() || contains_ignore_case(self.list(list), value) {
            return false;
        }
        self.list_mut(list).push(value.to_string());
        true
    }

    /// 대소문자를 무시하고 일치하는 항목을 제거한다.
    pub fn remove(&mut self, list: ProfileList, value: &str) -> bool {
        let needle = value.trim().to_lowercase();
        let items = self.list_mut(list);
        let before = items.len();
        items.retain(|item| item.to_lowercase() != needle);
        items.len() != before
    }

    pub fn add_allergy(&mut self, allergy: &str) -> bool {
        self.add(ProfileList::Allergies, allergy)
    }

    pub fn remove_allergy(&mut self, allergy: &str) -> bool {
        self.remove(ProfileList::Allergies, allergy)
    }

    /// `None`이면 값을 지운다.
    pub fn set_height(&mut self, height: Option<f64>) -> TriageResult<()> {
        check_positive("userProfile.height", height)?;
        self.height = height;
        Ok(())
    }

    pub fn set_weight(&mut self, weight: Option<f64>) -> TriageResult<()> {
        check_positive("userProfile.weight", weight)?;
        self.weight = weight;
        Ok(())
    }

    pub fn validate(&self) -> TriageResult<()> {
        check_positive("userProfile.height", self.height)?;
        check_positive("userProfile.weight", self.weight)
    }

    pub fn has_allergy(&self, allergy: &str) -> bool {
        contains_ignore_case(&self.allergies, allergy.trim())
    }
}

fn check_positive(field: &'static str, value: Option<f64>) -> TriageResult<()> {
    match value {
        Some(v) if !(v.is_finite() && v > 0.0) => Err(TriageError::validation(
            field,
            format!("양수여야 합니다 (입력값: {v})"),
        )),
        _ => Ok(()),
    }
}

fn contains_ignore_case(items: &[String], value: &str) -> bool {
    let needle = value.to_lowercase();
    items.iter().any(|item| item.to_lowercase() == needle)
}

/// 세션 또는 사용자 키로 프로필을 보관하는 저장소.
pub trait ProfileStore {
    type Error: std::error::Error;

    fn load(&self, key: &str) -> Result<Option<UserProfile>, Self::Error>;
    fn save(&self, key: &str, profile: &UserProfile) -> Result<(), Self::Error>;

    /// 저장된 프로필이 없으면 빈 프로필.
    fn load_or_default(&self, key: &str) -> Result<UserProfile, Self::Error> {
        Ok(self.load(key)?.unwrap_or_default())
    }
}

/// 프로세스 메모리에 두는 저장소 (세션 단위).
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<String, UserProfile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProfileStore for InMemoryProfileStore {
    type Error = Infallible;

    fn load(&self, key: &str) -> Result<Option<UserProfile>, Infallible> {
        let profiles = self.profiles.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(profiles.get(key).cloned())
    }

    fn save(&self, key: &str, profile: &UserProfile) -> Result<(), Infallible> {
        let mut profiles = self
            .profiles
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        profiles.insert(key.to_string(), profile.clone());
        Ok(())
    }
}
