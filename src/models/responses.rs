use crate::models::domain::{LocationPolicy, SkillEntry};
use serde::{Deserialize, Serialize};

/// The skill entry selected as the best match for the targeted skill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillMatchDetail {
    pub name: String,
    #[serde(rename = "yearsExperience")]
    pub years_experience: Option<i64>,
    pub similarity: f64,
}

/// Per-dimension diagnostics attached to every scored candidate. Only the
/// dimensions the request constrained are present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchDiagnostics {
    #[serde(
        rename = "skillSimilarity",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub skill_similarity: Option<f64>,
    #[serde(rename = "yearsScore", default, skip_serializing_if = "Option::is_none")]
    pub years_score: Option<f64>,
    /// Resolved candidate years minus the requested years.
    #[serde(rename = "yearsDelta", default, skip_serializing_if = "Option::is_none")]
    pub years_delta: Option<i64>,
    #[serde(
        rename = "locationSimilarity",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub location_similarity: Option<f64>,
    #[serde(
        rename = "traitCoverage",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub trait_coverage: Option<f64>,
    #[serde(
        rename = "matchedSkill",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub matched_skill: Option<SkillMatchDetail>,
}

/// One ranked individual, single mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    pub score: f64,
    pub exact: bool,
    pub diagnostics: MatchDiagnostics,
    /// Raw profile data echoed back for display.
    pub skills: Vec<SkillEntry>,
    pub traits: Vec<String>,
}

/// One filled role inside a band result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BandMember {
    /// The role label as it appeared in the request.
    pub role: String,
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    pub score: f64,
    pub diagnostics: MatchDiagnostics,
    pub skills: Vec<SkillEntry>,
    pub traits: Vec<String>,
}

/// One assembled band, group mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BandResult {
    pub score: f64,
    /// True only when every role was satisfiable in strict mode.
    pub exact: bool,
    pub roles: Vec<String>,
    #[serde(rename = "locationPolicy")]
    pub location_policy: LocationPolicy,
    pub members: Vec<BandMember>,
}

/// Single- or band-shaped result list, depending on the request mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatchResults {
    Individual(Vec<RankedCandidate>),
    Band(Vec<BandResult>),
}

impl MatchResults {
    pub fn len(&self) -> usize {
        match self {
            MatchResults::Individual(results) => results.len(),
            MatchResults::Band(results) => results.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Response written to stdout by the process boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    pub results: MatchResults,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}
