use crate::core::constraints::{ConstraintEvaluator, MatchMode};
use crate::models::responses::SkillMatchDetail;
use crate::models::{Candidate, MatchDiagnostics, Preference, ScoringWeights};

/// Round to 3 decimal places; scores and diagnostics are rounded so output
/// is stable and reproducible across runs.
#[inline]
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Computes the weighted fit score and per-dimension diagnostics for one
/// candidate against one preference. Each term is included only when the
/// corresponding preference field is set.
#[derive(Debug, Clone)]
pub struct Scorer {
    evaluator: ConstraintEvaluator,
    weights: ScoringWeights,
}

impl Scorer {
    pub fn new(evaluator: ConstraintEvaluator, weights: ScoringWeights) -> Self {
        Self { evaluator, weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn score(&self, candidate: &Candidate, prefs: &Preference) -> (f64, MatchDiagnostics) {
        let weights = &self.weights;
        let mut total = 0.0;
        let mut diagnostics = MatchDiagnostics::default();
        let mut contributing = 0;

        if let Some(skill) = prefs.skill.as_deref() {
            let best = self.evaluator.best_skill_match(candidate, skill);
            let sim = best.map_or(0.0, |(_, sim)| sim);
            total += sim * weights.skill;
            if sim > 0.0 {
                contributing += 1;
            }
            diagnostics.skill_similarity = Some(round3(sim));
            diagnostics.matched_skill = best.map(|(idx, sim)| {
                let entry = &candidate.skills[idx];
                SkillMatchDetail {
                    name: entry.name.clone(),
                    years_experience: entry.years_experience,
                    similarity: round3(sim),
                }
            });
        }

        if let Some(target) = prefs.years_experience {
            match self.evaluator.resolve_years(candidate, prefs.skill.as_deref()) {
                Some(years) => {
                    let diff = (years - target).abs();
                    let sub = if diff == 0 {
                        1.0
                    } else {
                        (1.0 - diff as f64 / weights.years_decay).max(0.0)
                    };
                    total += sub * weights.years;
                    if sub > 0.0 {
                        contributing += 1;
                    }
                    diagnostics.years_score = Some(round3(sub));
                    diagnostics.years_delta = Some(years - target);
                }
                None => {
                    // Consolation credit: discounts the candidate without
                    // eliminating them, and is not a contributing dimension.
                    total += weights.fallback_years_score * weights.fallback_years_weight;
                    diagnostics.years_score = Some(round3(weights.fallback_years_score));
                }
            }
        }

        if let Some(target) = prefs.location.as_deref() {
            let sim = self.evaluator.location_similarity(candidate, target);
            total += sim * weights.location;
            if sim > 0.0 {
                contributing += 1;
            }
            diagnostics.location_similarity = Some(round3(sim));
        }

        if !prefs.traits.is_empty() {
            let outcome = self.evaluator.match_traits(
                &candidate.traits,
                &prefs.traits,
                self.evaluator.trait_threshold(MatchMode::Relaxed),
            );
            let (coverage, weighted) = if outcome.total == 0 {
                (0.0, 0.0)
            } else {
                (
                    outcome.matched as f64 / outcome.total as f64,
                    outcome.similarity_sum / outcome.total as f64,
                )
            };
            let sub = weighted.max(coverage);
            total += sub * weights.traits;
            if sub > 0.0 {
                contributing += 1;
            }
            diagnostics.trait_coverage = Some(round3(coverage));
        }

        // Rewards well-rounded matches over single-dimension specialists.
        if contributing >= 3 {
            total += weights.balance_bonus;
        }

        (round3(total), diagnostics)
    }
}
