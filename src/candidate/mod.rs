//! Candidate records and the candidate-store collaborator interface.

pub mod error;
pub mod mock;
pub mod model;
pub mod profile;
pub mod store;


pub use error::CandidateStoreError;
#[cfg(any(test, feature = "mock"))]
pub use mock::InMemoryCandidateStore;
pub use model::{
    CandidateRecord, CompanyTier, SeniorityLevel, SkillAssertion, SkillCategory, SkillSource,
    Specialty,
};
pub use profile::{LEGACY_DEFAULT_CONFIDENCE, ProfileFormat, canonical_skills};
pub use store::CandidateStore;
