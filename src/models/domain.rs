use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One (skill, years) entry on a musician profile.
///
/// The same canonical skill may appear multiple times under different
/// spellings; matching is alias/fuzzy-aware, never exact-string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillEntry {
    pub name: String,
    #[serde(
        rename = "yearsExperience",
        alias = "years_experience",
        default,
        deserialize_with = "lenient_years"
    )]
    pub years_experience: Option<i64>,
}

/// Musician profile as supplied by the caller. Immutable engine input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub skills: Vec<SkillEntry>,
    /// Overall years of experience, used when no skill is targeted.
    #[serde(
        rename = "yearsExperience",
        alias = "years_experience",
        default,
        deserialize_with = "lenient_years"
    )]
    pub years_experience: Option<i64>,
}

/// Group-level location consistency policy for band requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LocationPolicy {
    AllSame,
    #[default]
    Unconstrained,
}

/// Per-role overrides layered on top of the base preference in band mode.
/// Unset fields inherit the base value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RolePreference {
    #[serde(rename = "yearsExperience", alias = "years_experience", default)]
    pub years_experience: Option<i64>,
    #[serde(default)]
    pub traits: Option<Vec<String>>,
    #[serde(default)]
    pub location: Option<String>,
}

/// A preference query. `roles: None` ranks individuals; `roles: Some(..)`
/// assembles a band with one slot per listed role.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preference {
    #[serde(default)]
    pub skill: Option<String>,
    #[serde(rename = "yearsExperience", alias = "years_experience", default)]
    pub years_experience: Option<i64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub roles: Option<Vec<String>>,
    /// Keyed by canonical role key, e.g. "guitar" for a "Guitarist" role.
    #[serde(rename = "roleOverrides", alias = "role_overrides", default)]
    pub role_overrides: HashMap<String, RolePreference>,
    #[serde(rename = "locationPolicy", alias = "location_policy", default)]
    pub location_policy: LocationPolicy,
}

impl Preference {
    /// Effective preference for one band role: the role's overrides layered
    /// onto the base request, with the role label as the target skill.
    pub fn for_role(&self, role: &str, canonical_key: &str) -> Preference {
        let overrides = self.role_overrides.get(canonical_key);
        Preference {
            skill: Some(role.to_string()),
            years_experience: overrides
                .and_then(|o| o.years_experience)
                .or(self.years_experience),
            location: overrides
                .and_then(|o| o.location.clone())
                .or_else(|| self.location.clone()),
            traits: overrides
                .and_then(|o| o.traits.clone())
                .unwrap_or_else(|| self.traits.clone()),
            roles: None,
            role_overrides: HashMap::new(),
            location_policy: LocationPolicy::Unconstrained,
        }
    }

    /// True when the skill dimension is the only one constrained.
    pub fn constrains_only_skill(&self) -> bool {
        self.skill.is_some()
            && self.years_experience.is_none()
            && self.location.is_none()
            && self.traits.is_empty()
    }
}

/// Similarity thresholds for the exact and relaxed matching profiles.
/// Calibration data, injected into the evaluator rather than hardcoded.
#[derive(Debug, Clone, Copy)]
pub struct MatchThresholds {
    pub skill_exact: f64,
    pub skill_relaxed: f64,
    pub location_exact: f64,
    pub location_relaxed: f64,
    pub trait_exact: f64,
    pub trait_relaxed: f64,
    pub trait_coverage_exact: f64,
    pub trait_coverage_relaxed: f64,
    /// Maximum tolerated years shortfall in relaxed mode.
    pub years_window: i64,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            skill_exact: 0.95,
            skill_relaxed: 0.78,
            location_exact: 0.85,
            location_relaxed: 0.75,
            trait_exact: 0.85,
            trait_relaxed: 0.75,
            trait_coverage_exact: 0.8,
            trait_coverage_relaxed: 0.6,
            years_window: 4,
        }
    }
}

/// Scoring weights
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    pub skill: f64,
    pub years: f64,
    pub location: f64,
    pub traits: f64,
    /// Years-difference at which the years sub-score decays to zero.
    pub years_decay: f64,
    /// Added once when at least three dimensions contribute a positive
    /// sub-score.
    pub balance_bonus: f64,
    /// Added to a band total when all members are location-cohesive under
    /// relaxed thresholds, whatever the requested policy.
    pub cohesion_bonus: f64,
    /// Consolation sub-score for a years target the candidate never
    /// declared, applied at `fallback_years_weight`.
    pub fallback_years_score: f64,
    pub fallback_years_weight: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skill: 4.0,
            years: 2.5,
            location: 2.5,
            traits: 3.5,
            years_decay: 4.0,
            balance_bonus: 0.5,
            cohesion_bonus: 0.75,
            fallback_years_score: 0.2,
            fallback_years_weight: 0.5,
        }
    }
}

/// Years values arrive from upstream feeds as ints, floats or strings.
/// Anything non-numeric decodes as absent instead of failing the request.
fn lenient_years<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(coerce_years))
}

fn coerce_years(value: serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}
