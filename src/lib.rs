//! Sesh Match - matching and band assembly engine for the Sesh musician network
//!
//! Ranks musicians against a structured preference query and assembles
//! multi-role bands under a group location policy. Matching is alias- and
//! fuzzy-aware, with an exact pass and a relaxed fallback pass.

pub mod config;
pub mod core;
pub mod models;

// Re-export commonly used types
pub use crate::core::{normalize, similarity, AliasResolver, MatchEngine, MatchReport};
pub use crate::models::{
    Candidate, MatchRequest, MatchResponse, MatchResults, MatchThresholds, Preference,
    ScoringWeights,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let engine = MatchEngine::with_defaults();
        let report = engine.solve(&[], &Preference::default(), 5);
        assert_eq!(report.total_candidates, 0);
    }
}
