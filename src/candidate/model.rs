use serde::{Deserialize, Serialize};

use super::profile::ProfileFormat;

/// Where a skill assertion came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillSource {
    /// Stated directly by the candidate or recruiter.
    Explicit,
    /// Derived from profile text by analysis.
    Inferred,
}

/// Coarse category of a skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    Technical,
    Soft,
    Domain,
}

/// A single skill claim with a confidence score.
///
/// `skill` is stored lower-cased; [`crate::candidate::canonical_skills`]
/// guarantees this for every assertion the scoring engine sees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillAssertion {
    /// Lower-cased canonical skill name.
    pub skill: String,
    /// Confidence in `[0, 100]`.
    pub confidence: f32,
    /// Assertion provenance.
    pub source: SkillSource,
    /// Skill category.
    pub category: SkillCategory,
}

impl SkillAssertion {
    /// Creates an assertion, lower-casing the name and clamping confidence
    /// into `[0, 100]`.
    pub fn new(skill: &str, confidence: f32, source: SkillSource, category: SkillCategory) -> Self {
        Self {
            skill: skill.trim().to_lowercase(),
            confidence: confidence.clamp(0.0, 100.0),
            source,
            category,
        }
    }

    /// Shorthand for an explicit technical skill.
    pub fn technical(skill: &str, confidence: f32) -> Self {
        Self::new(skill, confidence, SkillSource::Explicit, SkillCategory::Technical)
    }
}

/// Seniority level. Closed set; every level has a band and keyword entry in
/// the experience tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeniorityLevel {
    Entry,
    Mid,
    Senior,
    Executive,
}

impl SeniorityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Mid => "mid",
            Self::Senior => "senior",
            Self::Executive => "executive",
        }
    }

    /// Parses a stored payload value back into a level.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "entry" => Some(Self::Entry),
            "mid" => Some(Self::Mid),
            "senior" => Some(Self::Senior),
            "executive" => Some(Self::Executive),
            _ => None,
        }
    }
}

impl std::fmt::Display for SeniorityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Employer pedigree bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanyTier {
    Tier1,
    Tier2,
    Tier3,
}

impl CompanyTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tier1 => "tier1",
            Self::Tier2 => "tier2",
            Self::Tier3 => "tier3",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "tier1" => Some(Self::Tier1),
            "tier2" => Some(Self::Tier2),
            "tier3" => Some(Self::Tier3),
            _ => None,
        }
    }
}

/// Technical sub-domain inferred from a role title. Closed set; every value
/// has a keyword-table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Specialty {
    Backend,
    Frontend,
    Data,
    Platform,
    Mobile,
}

impl Specialty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Backend => "backend",
            Self::Frontend => "frontend",
            Self::Data => "data",
            Self::Platform => "platform",
            Self::Mobile => "mobile",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "backend" => Some(Self::Backend),
            "frontend" => Some(Self::Frontend),
            "data" => Some(Self::Data),
            "platform" => Some(Self::Platform),
            "mobile" => Some(Self::Mobile),
            _ => None,
        }
    }

    /// Title keywords signalling this specialty. The `match` is exhaustive,
    /// so adding a variant without a keyword row fails to compile.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Backend => &["backend", "back-end", "api", "server", "distributed"],
            Self::Frontend => &["frontend", "front-end", "ui", "web", "react", "angular"],
            Self::Data => &["data", "machine learning", "ml", "analytics", "etl"],
            Self::Platform => &["platform", "infrastructure", "devops", "sre", "cloud"],
            Self::Mobile => &["mobile", "ios", "android", "flutter", "react native"],
        }
    }

    /// Infers a specialty from a role title, first keyword table that hits.
    pub fn infer_from_title(title: &str) -> Option<Self> {
        let lower = title.to_lowercase();
        const ALL: [Specialty; 5] = [
            Specialty::Backend,
            Specialty::Frontend,
            Specialty::Data,
            Specialty::Platform,
            Specialty::Mobile,
        ];
        ALL.into_iter()
            .find(|s| s.keywords().iter().any(|kw| lower.contains(kw)))
    }
}

impl std::fmt::Display for Specialty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured candidate profile as returned by the candidate store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRecord {
    /// Stable candidate id.
    pub id: String,
    /// Display name.
    pub full_name: String,
    /// Contact email, if known.
    pub email: Option<String>,
    /// Current role title, if known.
    pub title: Option<String>,
    /// Total years of professional experience.
    pub years_experience: Option<f32>,
    /// Current seniority level.
    pub current_level: Option<SeniorityLevel>,
    /// Employer pedigree bucket.
    pub company_tier: Option<CompanyTier>,
    /// Specialties in priority order; the first entry is primary.
    pub specialties: Vec<Specialty>,
    /// ISO country code, if geocoded.
    pub country: Option<String>,
    /// Pre-computed overall profile quality score in `[0, 100]`.
    pub overall_score: Option<f32>,
    /// Analysis confidence in `[0, 1]`; low values demote composite scores.
    pub analysis_confidence: Option<f32>,
    /// Skills payload in whichever format the upstream analysis produced.
    pub profile: ProfileFormat,
}

impl CandidateRecord {
    /// Primary specialty (first-listed), if any specialty data exists.
    pub fn primary_specialty(&self) -> Option<Specialty> {
        self.specialties.first().copied()
    }
}
