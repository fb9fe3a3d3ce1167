use crate::core::constraints::{ConstraintEvaluator, MatchMode};
use crate::core::scoring::Scorer;
use crate::models::{Candidate, Preference, RankedCandidate};

/// Filters and ranks individuals for a single-role request.
///
/// Strict matching runs first; relaxed matching is attempted only when the
/// strict pass leaves nothing, so a response never mixes the two profiles.
#[derive(Debug, Clone)]
pub struct CandidateRanker {
    evaluator: ConstraintEvaluator,
    scorer: Scorer,
}

impl CandidateRanker {
    pub fn new(evaluator: ConstraintEvaluator, scorer: Scorer) -> Self {
        Self { evaluator, scorer }
    }

    pub fn rank(
        &self,
        candidates: &[Candidate],
        prefs: &Preference,
        limit: usize,
    ) -> Vec<RankedCandidate> {
        // A request constraining nothing but the skill has no stricter
        // alternative; a relaxed skill match already counts as exact.
        let (survivors, exact) = if prefs.constrains_only_skill() {
            (self.filter(candidates, prefs, MatchMode::Relaxed), true)
        } else {
            let strict = self.filter(candidates, prefs, MatchMode::Exact);
            if strict.is_empty() {
                tracing::debug!("strict matching left no candidates, retrying relaxed");
                (self.filter(candidates, prefs, MatchMode::Relaxed), false)
            } else {
                (strict, true)
            }
        };

        let mut results: Vec<RankedCandidate> = survivors
            .into_iter()
            .map(|candidate| {
                let (score, diagnostics) = self.scorer.score(candidate, prefs);
                RankedCandidate {
                    id: candidate.id.clone(),
                    name: candidate.name.clone(),
                    location: candidate.location.clone(),
                    score,
                    exact,
                    diagnostics,
                    skills: candidate.skills.clone(),
                    traits: candidate.traits.clone(),
                }
            })
            .collect();

        // Stable sort: candidates with equal keys keep their pool order.
        results.sort_by(|a, b| b.exact.cmp(&a.exact).then(b.score.total_cmp(&a.score)));
        results.truncate(limit);
        results
    }

    fn filter<'a>(
        &self,
        candidates: &'a [Candidate],
        prefs: &Preference,
        mode: MatchMode,
    ) -> Vec<&'a Candidate> {
        candidates
            .iter()
            .filter(|candidate| self.evaluator.satisfies(candidate, prefs, mode))
            .collect()
    }
}
