//! 증상 문장과 건강 프로필로 위험도와 일반의약품 추천을 만드는 결정적 분석 엔진.
//!
//! 진입점은 [`analyze`]와 [`TriageEngine::assemble`]이다. 모든 규칙 테이블은 엔진 생성
//! 시 검증되고, 분석 호출은 상태를 남기지 않는다.

pub mod catalog;
pub mod condition;
pub mod config;
pub mod engine;
pub mod error;
pub mod intake;
pub mod location;
pub mod medicine;
pub mod model;
pub mod profile;
pub mod request;
pub mod risk;
pub mod rules;

pub use catalog::{Catalog, ConditionProfile};
pub use condition::{ConditionMatch, ConditionMatcher};
pub use config::{ClassifierKind, TriageConfig};
pub use engine::{analyze, AnalysisStage, Classifier, TriageEngine};
pub use error::{TriageError, TriageResult};
pub use location::{FixedLocationProvider, LocationProvider, StaticLocationProvider};
pub use medicine::{filter_contraindicated, MedicineSelection, MedicineSelector};
pub use model::{
    Condition, EmergencyFacility, EmergencyInfo, LocationChannel, LocationKind,
    MedicalRecommendation, Medicine, OnlineStore, RiskAssessment, RiskLevel, SalesLocation,
    StoreFront, UserProfile,
};
pub use profile::{InMemoryProfileStore, ProfileList, ProfileStore};
pub use request::AnalysisRequest;
pub use risk::RiskClassifier;
