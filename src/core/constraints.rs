use crate::core::alias::AliasResolver;
use crate::core::text::{normalize, similarity};
use crate::models::{Candidate, MatchThresholds, Preference};

/// Threshold profile used when evaluating constraints. Relaxed is strictly
/// more permissive than exact in every dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    Exact,
    Relaxed,
}

/// Outcome of the greedy one-to-one trait assignment.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraitMatch {
    pub matched: usize,
    pub total: usize,
    /// Sum of the similarities of the matched pairs.
    pub similarity_sum: f64,
}

/// Decides, per candidate and per requirement dimension, whether a candidate
/// satisfies a preference. All constrained dimensions must pass; missing
/// candidate data fails the dimension that depends on it, never the whole
/// evaluation.
#[derive(Debug, Clone)]
pub struct ConstraintEvaluator {
    resolver: AliasResolver,
    thresholds: MatchThresholds,
}

impl ConstraintEvaluator {
    pub fn new(resolver: AliasResolver, thresholds: MatchThresholds) -> Self {
        Self {
            resolver,
            thresholds,
        }
    }

    pub fn resolver(&self) -> &AliasResolver {
        &self.resolver
    }

    pub fn thresholds(&self) -> &MatchThresholds {
        &self.thresholds
    }

    /// Evaluate every constrained dimension under the given mode.
    pub fn satisfies(&self, candidate: &Candidate, prefs: &Preference, mode: MatchMode) -> bool {
        if let Some(skill) = prefs.skill.as_deref() {
            if !self.skill_matches(candidate, skill, mode) {
                return false;
            }
        }

        if let Some(target) = prefs.location.as_deref() {
            if self.location_similarity(candidate, target) < self.location_threshold(mode) {
                return false;
            }
        }

        if !prefs.traits.is_empty() {
            let outcome =
                self.match_traits(&candidate.traits, &prefs.traits, self.trait_threshold(mode));
            if outcome.matched < self.required_trait_count(outcome.total, mode) {
                return false;
            }
        }

        if let Some(target) = prefs.years_experience {
            let Some(years) = self.resolve_years(candidate, prefs.skill.as_deref()) else {
                // A years target with no resolvable years fails both modes.
                return false;
            };
            let tolerated_shortfall = match mode {
                MatchMode::Exact => 0,
                MatchMode::Relaxed => self.thresholds.years_window,
            };
            if years < target - tolerated_shortfall {
                return false;
            }
        }

        true
    }

    /// True when any skill entry matches the target by canonical key or by
    /// similarity at the mode's threshold.
    pub fn skill_matches(&self, candidate: &Candidate, skill: &str, mode: MatchMode) -> bool {
        let target_key = self.resolver.canonical_key(skill);
        let threshold = match mode {
            MatchMode::Exact => self.thresholds.skill_exact,
            MatchMode::Relaxed => self.thresholds.skill_relaxed,
        };
        candidate.skills.iter().any(|entry| {
            self.resolver.canonical_key(&entry.name) == target_key
                || similarity(&entry.name, skill) >= threshold
        })
    }

    /// Best skill entry for the target: index and alias-aware similarity
    /// (1.0 on canonical-key match). None when the candidate lists no skills.
    pub fn best_skill_match(&self, candidate: &Candidate, skill: &str) -> Option<(usize, f64)> {
        let target_key = self.resolver.canonical_key(skill);
        let mut best: Option<(usize, f64)> = None;
        for (idx, entry) in candidate.skills.iter().enumerate() {
            let sim = if self.resolver.canonical_key(&entry.name) == target_key {
                1.0
            } else {
                similarity(&entry.name, skill)
            };
            if best.map_or(true, |(_, current)| sim > current) {
                best = Some((idx, sim));
            }
        }
        best
    }

    /// Similarity between the candidate's location and the target; a missing
    /// location scores 0.0.
    pub fn location_similarity(&self, candidate: &Candidate, target: &str) -> f64 {
        candidate
            .location
            .as_deref()
            .map_or(0.0, |location| similarity(location, target))
    }

    pub fn location_threshold(&self, mode: MatchMode) -> f64 {
        match mode {
            MatchMode::Exact => self.thresholds.location_exact,
            MatchMode::Relaxed => self.thresholds.location_relaxed,
        }
    }

    pub fn trait_threshold(&self, mode: MatchMode) -> f64 {
        match mode {
            MatchMode::Exact => self.thresholds.trait_exact,
            MatchMode::Relaxed => self.thresholds.trait_relaxed,
        }
    }

    /// Minimum matched traits required for the mode's coverage ratio.
    pub fn required_trait_count(&self, total: usize, mode: MatchMode) -> usize {
        let coverage = match mode {
            MatchMode::Exact => self.thresholds.trait_coverage_exact,
            MatchMode::Relaxed => self.thresholds.trait_coverage_relaxed,
        };
        (total as f64 * coverage).ceil() as usize
    }

    /// Greedy one-to-one trait assignment: each desired trait, in request
    /// order, takes the most similar unused candidate trait above the
    /// threshold. A greedy approximation of maximum bipartite matching, not
    /// globally optimal.
    pub fn match_traits(
        &self,
        candidate_traits: &[String],
        desired: &[String],
        threshold: f64,
    ) -> TraitMatch {
        let desired: Vec<String> = desired
            .iter()
            .map(|t| normalize(t))
            .filter(|t| !t.is_empty())
            .collect();
        let available: Vec<String> = candidate_traits.iter().map(|t| normalize(t)).collect();

        let mut used = vec![false; available.len()];
        let mut matched = 0;
        let mut similarity_sum = 0.0;

        for want in &desired {
            let mut best: Option<(usize, f64)> = None;
            for (idx, have) in available.iter().enumerate() {
                if used[idx] || have.is_empty() {
                    continue;
                }
                let sim = similarity(want, have);
                if sim >= threshold && best.map_or(true, |(_, current)| sim > current) {
                    best = Some((idx, sim));
                }
            }
            if let Some((idx, sim)) = best {
                used[idx] = true;
                matched += 1;
                similarity_sum += sim;
            }
        }

        TraitMatch {
            matched,
            total: desired.len(),
            similarity_sum,
        }
    }

    /// Resolve the candidate's years for the target skill: the first skill
    /// entry whose canonical key equals the target's and carries a
    /// non-negative value. With no target skill, the overall years field.
    /// Negative values count as absent.
    pub fn resolve_years(&self, candidate: &Candidate, target_skill: Option<&str>) -> Option<i64> {
        match target_skill {
            Some(skill) => {
                let key = self.resolver.canonical_key(skill);
                candidate
                    .skills
                    .iter()
                    .filter(|entry| self.resolver.canonical_key(&entry.name) == key)
                    .filter_map(|entry| entry.years_experience)
                    .find(|years| *years >= 0)
            }
            None => candidate.years_experience.filter(|years| *years >= 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SkillEntry;

    fn evaluator() -> ConstraintEvaluator {
        ConstraintEvaluator::new(AliasResolver::default(), MatchThresholds::default())
    }

    fn create_candidate(skill: &str, years: Option<i64>, location: &str) -> Candidate {
        Candidate {
            id: "1".to_string(),
            name: "Ana".to_string(),
            location: Some(location.to_string()),
            traits: vec![],
            skills: vec![SkillEntry {
                name: skill.to_string(),
                years_experience: years,
            }],
            years_experience: None,
        }
    }

    fn skill_prefs(skill: &str) -> Preference {
        Preference {
            skill: Some(skill.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_skill_matches_across_spellings() {
        let evaluator = evaluator();
        let candidate = create_candidate("Guitarrist", Some(4), "Lisboa");

        // Alias-resolved canonical keys match even in exact mode.
        assert!(evaluator.skill_matches(&candidate, "Guitarra", MatchMode::Exact));
        assert!(evaluator.skill_matches(&candidate, "guitar", MatchMode::Exact));
        assert!(!evaluator.skill_matches(&candidate, "Drums", MatchMode::Relaxed));
    }

    #[test]
    fn test_satisfies_skill_dimension() {
        let evaluator = evaluator();
        let candidate = create_candidate("Voz", Some(2), "Lisboa");

        assert!(evaluator.satisfies(&candidate, &skill_prefs("Lead Vocals"), MatchMode::Exact));
        assert!(!evaluator.satisfies(&candidate, &skill_prefs("Violin"), MatchMode::Relaxed));
    }

    #[test]
    fn test_location_thresholds() {
        let evaluator = evaluator();
        let candidate = create_candidate("Guitar", Some(4), "Lisbon");
        let prefs = Preference {
            location: Some("Lisboa".to_string()),
            ..Default::default()
        };

        // "lisbon" vs "lisboa" sits between the relaxed and exact cutoffs
        assert!(!evaluator.satisfies(&candidate, &prefs, MatchMode::Exact));
        assert!(evaluator.satisfies(&candidate, &prefs, MatchMode::Relaxed));
    }

    #[test]
    fn test_missing_location_fails_dimension() {
        let evaluator = evaluator();
        let mut candidate = create_candidate("Guitar", Some(4), "Lisboa");
        candidate.location = None;
        let prefs = Preference {
            location: Some("Lisboa".to_string()),
            ..Default::default()
        };

        assert!(!evaluator.satisfies(&candidate, &prefs, MatchMode::Relaxed));
    }

    #[test]
    fn test_trait_coverage_requirements() {
        let evaluator = evaluator();
        let mut candidate = create_candidate("Guitar", Some(4), "Lisboa");
        candidate.traits = vec!["Punctual".to_string(), "Rock".to_string()];
        let prefs = Preference {
            traits: vec![
                "Punctual".to_string(),
                "Rock".to_string(),
                "Creative".to_string(),
            ],
            ..Default::default()
        };

        // 2 of 3 matched: exact needs ceil(3 * 0.8) = 3, relaxed ceil(3 * 0.6) = 2
        assert!(!evaluator.satisfies(&candidate, &prefs, MatchMode::Exact));
        assert!(evaluator.satisfies(&candidate, &prefs, MatchMode::Relaxed));
    }

    #[test]
    fn test_trait_matching_is_one_to_one() {
        let evaluator = evaluator();
        let outcome = evaluator.match_traits(
            &["Rock".to_string()],
            &["Rock".to_string(), "Rock".to_string()],
            0.75,
        );
        // One candidate trait cannot satisfy two desired traits.
        assert_eq!(outcome.matched, 1);
        assert_eq!(outcome.total, 2);
    }

    #[test]
    fn test_years_target_is_a_floor() {
        let evaluator = evaluator();
        let prefs = Preference {
            skill: Some("Guitar".to_string()),
            years_experience: Some(3),
            ..Default::default()
        };

        let seasoned = create_candidate("Guitar", Some(4), "Lisboa");
        assert!(evaluator.satisfies(&seasoned, &prefs, MatchMode::Exact));

        let near = create_candidate("Guitar", Some(1), "Lisboa");
        assert!(!evaluator.satisfies(&near, &prefs, MatchMode::Exact));
        assert!(evaluator.satisfies(&near, &prefs, MatchMode::Relaxed));

        // Shortfall beyond the window fails relaxed mode too.
        let green = create_candidate("Guitar", Some(3), "Lisboa");
        let demanding = Preference {
            skill: Some("Guitar".to_string()),
            years_experience: Some(9),
            ..Default::default()
        };
        assert!(!evaluator.satisfies(&green, &demanding, MatchMode::Relaxed));
    }

    #[test]
    fn test_unresolved_years_fails_both_modes() {
        let evaluator = evaluator();
        let candidate = create_candidate("Guitar", None, "Lisboa");
        let prefs = Preference {
            skill: Some("Guitar".to_string()),
            years_experience: Some(3),
            ..Default::default()
        };

        assert!(!evaluator.satisfies(&candidate, &prefs, MatchMode::Exact));
        assert!(!evaluator.satisfies(&candidate, &prefs, MatchMode::Relaxed));
    }

    #[test]
    fn test_resolve_years_via_alias_and_sign() {
        let evaluator = evaluator();
        let candidate = create_candidate("Guitarrist", Some(5), "Lisboa");
        assert_eq!(evaluator.resolve_years(&candidate, Some("guitar")), Some(5));

        let negative = create_candidate("Guitar", Some(-2), "Lisboa");
        assert_eq!(evaluator.resolve_years(&negative, Some("guitar")), None);
    }

    #[test]
    fn test_resolve_years_overall_fallback() {
        let evaluator = evaluator();
        let mut candidate = create_candidate("Guitar", None, "Lisboa");
        candidate.years_experience = Some(7);

        assert_eq!(evaluator.resolve_years(&candidate, None), Some(7));
        // A targeted skill ignores the overall field.
        assert_eq!(evaluator.resolve_years(&candidate, Some("guitar")), None);
    }

    #[test]
    fn test_unconstrained_preference_accepts_everyone() {
        let evaluator = evaluator();
        let candidate = create_candidate("Triangle", None, "Faro");
        assert!(evaluator.satisfies(&candidate, &Preference::default(), MatchMode::Exact));
    }
}
