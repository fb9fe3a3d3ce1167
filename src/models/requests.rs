use crate::models::domain::{Candidate, Preference};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to rank candidates or assemble a band
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatchRequest {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub preferences: Preference,
    /// When absent, the configured per-mode default applies.
    #[validate(range(min = 1, max = 100))]
    #[serde(rename = "maxResults", alias = "max_results", default)]
    pub max_results: Option<u16>,
}
