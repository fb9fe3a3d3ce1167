use crate::core::alias::AliasResolver;
use crate::core::band::BandAssembler;
use crate::core::constraints::ConstraintEvaluator;
use crate::core::rank::CandidateRanker;
use crate::core::scoring::Scorer;
use crate::models::{Candidate, MatchResults, MatchThresholds, Preference, ScoringWeights};

/// Result of one solve call
#[derive(Debug, Clone)]
pub struct MatchReport {
    pub results: MatchResults,
    pub total_candidates: usize,
}

/// Main engine - dispatches a preference query to the individual ranker or
/// the band assembler, both sharing one configured evaluator and scorer.
#[derive(Debug, Clone)]
pub struct MatchEngine {
    ranker: CandidateRanker,
    assembler: BandAssembler,
}

impl MatchEngine {
    pub fn new(
        resolver: AliasResolver,
        thresholds: MatchThresholds,
        weights: ScoringWeights,
    ) -> Self {
        let evaluator = ConstraintEvaluator::new(resolver, thresholds);
        let scorer = Scorer::new(evaluator.clone(), weights);
        Self {
            ranker: CandidateRanker::new(evaluator.clone(), scorer.clone()),
            assembler: BandAssembler::new(evaluator, scorer),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(
            AliasResolver::default(),
            MatchThresholds::default(),
            ScoringWeights::default(),
        )
    }

    /// Solve one request against a candidate pool.
    ///
    /// Band mode when the preference names a role list, individual ranking
    /// otherwise. `limit` caps the number of returned results.
    pub fn solve(
        &self,
        candidates: &[Candidate],
        prefs: &Preference,
        limit: usize,
    ) -> MatchReport {
        let total_candidates = candidates.len();
        let results = if prefs.roles.is_some() {
            tracing::debug!(total_candidates, limit, "assembling band");
            MatchResults::Band(self.assembler.assemble(candidates, prefs, limit))
        } else {
            tracing::debug!(total_candidates, limit, "ranking individuals");
            MatchResults::Individual(self.ranker.rank(candidates, prefs, limit))
        };

        MatchReport {
            results,
            total_candidates,
        }
    }
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SkillEntry;

    fn create_candidate(id: &str, skill: &str) -> Candidate {
        Candidate {
            id: id.to_string(),
            name: format!("Musician {}", id),
            location: Some("Lisboa".to_string()),
            traits: vec![],
            skills: vec![SkillEntry {
                name: skill.to_string(),
                years_experience: Some(3),
            }],
            years_experience: None,
        }
    }

    #[test]
    fn test_dispatches_single_mode_without_roles() {
        let engine = MatchEngine::with_defaults();
        let candidates = vec![create_candidate("1", "Guitar")];
        let prefs = Preference {
            skill: Some("Guitar".to_string()),
            ..Default::default()
        };

        let report = engine.solve(&candidates, &prefs, 5);

        assert_eq!(report.total_candidates, 1);
        assert!(matches!(report.results, MatchResults::Individual(ref r) if r.len() == 1));
    }

    #[test]
    fn test_dispatches_band_mode_with_roles() {
        let engine = MatchEngine::with_defaults();
        let candidates = vec![
            create_candidate("1", "Guitar"),
            create_candidate("2", "Drums"),
        ];
        let prefs = Preference {
            roles: Some(vec!["Guitar".to_string(), "Drums".to_string()]),
            ..Default::default()
        };

        let report = engine.solve(&candidates, &prefs, 5);

        assert!(matches!(report.results, MatchResults::Band(ref r) if r.len() == 1));
    }

    #[test]
    fn test_band_request_with_zero_roles_is_empty() {
        let engine = MatchEngine::with_defaults();
        let candidates = vec![create_candidate("1", "Guitar")];
        let prefs = Preference {
            roles: Some(vec![]),
            ..Default::default()
        };

        let report = engine.solve(&candidates, &prefs, 5);

        assert!(matches!(report.results, MatchResults::Band(ref r) if r.is_empty()));
    }
}
