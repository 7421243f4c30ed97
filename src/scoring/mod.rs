//! Skill-aware composite scoring.

pub mod experience;
pub mod scorer;
pub mod skills;
pub mod types;


pub use experience::{KEYWORD_MISS_SCORE, LevelProfile, experience_match_score, level_profile};
pub use scorer::SkillScorer;
pub use skills::{MatchKind, SUBSTRING_PENALTY, SkillMatch, resolve};
pub use types::{
    PREFERRED_MIN_CONFIDENCE, PREFERRED_PARTIAL_CREDIT, PREFERRED_WEIGHT,
    REQUIRED_MIN_CONFIDENCE, REQUIRED_PARTIAL_CREDIT, REQUIRED_WEIGHT, ScoredCandidate,
    ScoringWeights, SkillRequirement,
};
