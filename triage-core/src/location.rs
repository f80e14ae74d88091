use std::collections::HashMap;

use crate::catalog::Catalog;
use crate::error::TriageResult;
use crate::model::{Condition, SalesLocation};

/// 질환에 맞는 판매처 목록을 제공한다.
///
/// 같은 입력에는 같은 순서의 결과를 돌려줘야 한다. 현재 시각에 따라 영업 상태를
/// 계산하는 구현은 허용하지 않는다.
pub trait LocationProvider: Send + Sync {
    fn locate(&self, condition: &Condition) -> Vec<SalesLocation>;
}

/// 테이블에 작성된 판매처를 그대로 돌려주는 기본 구현.
#[derive(Debug, Clone)]
pub struct StaticLocationProvider {
    by_condition: HashMap<String, Vec<SalesLocation>>,
    default: Vec<SalesLocation>,
}

impl StaticLocationProvider {
    pub fn from_catalog(catalog: &Catalog) -> TriageResult<Self> {
        let resolve = |ids: &[String]| -> TriageResult<Vec<SalesLocation>> {
            ids.iter().map(|id| catalog.location(id).cloned()).collect()
        };

        let mut by_condition = HashMap::new();
        for profile in catalog.profiles() {
            by_condition.insert(profile.primary.name.clone(), resolve(&profile.location_ids)?);
        }

        Ok(Self {
            by_condition,
            default: resolve(&catalog.fallback.location_ids)?,
        })
    }
}

impl LocationProvider for StaticLocationProvider {
    /// 테이블에 없는 질환(외부 모델 결과 등)은 기본 질환의 판매처를 쓴다.
    fn locate(&self, condition: &Condition) -> Vec<SalesLocation> {
        self.by_condition
            .get(&condition.name)
            .unwrap_or(&self.default)
            .clone()
    }
}

/// 주어진 목록을 항상 그대로 돌려준다. 테스트나 외부 조회 결과 고정용.
#[derive(Debug, Clone, Default)]
pub struct FixedLocationProvider {
    locations: Vec<SalesLocation>,
}

impl FixedLocationProvider {
    pub fn new(locations: Vec<SalesLocation>) -> Self {
        Self { locations }
    }
}

impl LocationProvider for FixedLocationProvider {
    fn locate(&self, _condition: &Condition) -> Vec<SalesLocation> {
        self.locations.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::model::LocationKind;

    fn condition(name: &str) -> Condition {
        Condition {
            name: name.into(),
            description: String::new(),
            probability: None,
        }
    }

    #[test]
    fn locations_follow_authored_order() {
        let provider = StaticLocationProvider::from_catalog(&catalog::builtin()).unwrap();
        let ids: Vec<String> = provider
            .locate(&condition("긴장성 두통"))
            .into_iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(
            ids,
            vec![
                "pharmacy-teunteun",
                "pharmacy-huimang",
                "cu-samseong",
                "online-healthcare"
            ]
        );
    }

    #[test]
    fn each_location_has_exactly_one_field_group() {
        let provider = StaticLocationProvider::from_catalog(&catalog::builtin()).unwrap();
        for location in provider.locate(&condition("감기")) {
            let physical = location.channel.store_front().is_some();
            let online = location.channel.online().is_some();
            assert!(physical ^ online, "{}", location.id);
            assert_eq!(online, location.channel.kind() == LocationKind::OnlineStore);
        }
    }

    #[test]
    fn unknown_condition_uses_default_list() {
        let catalog = catalog::builtin();
        let provider = StaticLocationProvider::from_catalog(&catalog).unwrap();
        let fallback = provider.locate(&catalog.fallback.primary);
        assert_eq!(provider.locate(&condition("편도염")), fallback);
    }

    #[test]
    fn fixed_provider_ignores_condition() {
        let provider = FixedLocationProvider::new(Vec::new());
        assert!(provider.locate(&condition("감기")).is_empty());
    }
}
