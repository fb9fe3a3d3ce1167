use crate::core::constraints::{ConstraintEvaluator, MatchMode};
use crate::core::scoring::{round3, Scorer};
use crate::core::text::similarity;
use crate::models::{
    BandMember, BandResult, Candidate, LocationPolicy, MatchDiagnostics, Preference,
};
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};

/// Assigns distinct candidates to the request's roles via backtracking
/// search, keeping the best K complete assignments by total score.
///
/// Strict matching runs first; relaxed matching is attempted only when the
/// strict search completes without a single full assignment.
#[derive(Debug, Clone)]
pub struct BandAssembler {
    evaluator: ConstraintEvaluator,
    scorer: Scorer,
}

/// One eligible candidate inside a role's domain, scored in isolation
/// against that role's effective preference.
#[derive(Debug, Clone)]
struct DomainEntry {
    candidate_idx: usize,
    score: f64,
    diagnostics: MatchDiagnostics,
}

/// A role slot prepared for search.
#[derive(Debug, Clone)]
struct RoleSlot {
    /// Position of the role in the original request.
    request_pos: usize,
    label: String,
    domain: Vec<DomainEntry>,
}

/// A complete assignment retained by the best-K structure. `picks[d]` is the
/// chosen domain index for slot `d` in search order.
#[derive(Debug, Clone)]
struct RetainedAssignment {
    score: f64,
    seq: u64,
    picks: Vec<usize>,
}

impl PartialEq for RetainedAssignment {
    fn eq(&self, other: &Self) -> bool {
        self.score == other.score && self.seq == other.seq
    }
}

impl Eq for RetainedAssignment {}

impl PartialOrd for RetainedAssignment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RetainedAssignment {
    fn cmp(&self, other: &Self) -> Ordering {
        // Among equal scores the later discovery ranks lower, so the
        // earliest-found assignment survives eviction.
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Bounded best-K retention: a min-heap whose root is the worst kept
/// assignment.
#[derive(Debug)]
struct BestK {
    capacity: usize,
    heap: BinaryHeap<Reverse<RetainedAssignment>>,
}

impl BestK {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            heap: BinaryHeap::with_capacity(capacity + 1),
        }
    }

    fn is_full(&self) -> bool {
        self.heap.len() >= self.capacity
    }

    fn worst_score(&self) -> Option<f64> {
        self.heap.peek().map(|Reverse(kept)| kept.score)
    }

    fn offer(&mut self, assignment: RetainedAssignment) {
        if self.capacity == 0 {
            return;
        }
        if self.heap.len() < self.capacity {
            self.heap.push(Reverse(assignment));
            return;
        }
        if let Some(Reverse(worst)) = self.heap.peek() {
            if assignment.score > worst.score {
                self.heap.pop();
                self.heap.push(Reverse(assignment));
            }
        }
    }

    fn into_sorted_desc(self) -> Vec<RetainedAssignment> {
        let mut kept: Vec<_> = self.heap.into_iter().map(|Reverse(a)| a).collect();
        kept.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.seq.cmp(&b.seq)));
        kept
    }
}

impl BandAssembler {
    pub fn new(evaluator: ConstraintEvaluator, scorer: Scorer) -> Self {
        Self { evaluator, scorer }
    }

    pub fn assemble(
        &self,
        candidates: &[Candidate],
        prefs: &Preference,
        limit: usize,
    ) -> Vec<BandResult> {
        let Some(roles) = prefs.roles.as_deref() else {
            return Vec::new();
        };
        // A group request naming zero roles yields zero results.
        if roles.is_empty() || limit == 0 {
            return Vec::new();
        }

        let strict = self.search_mode(candidates, prefs, roles, MatchMode::Exact, limit);
        if !strict.is_empty() {
            return strict;
        }
        tracing::debug!("strict band search found no assignment, retrying relaxed");
        self.search_mode(candidates, prefs, roles, MatchMode::Relaxed, limit)
    }

    fn search_mode(
        &self,
        candidates: &[Candidate],
        prefs: &Preference,
        roles: &[String],
        mode: MatchMode,
        limit: usize,
    ) -> Vec<BandResult> {
        let mut slots = Vec::with_capacity(roles.len());
        for (request_pos, role) in roles.iter().enumerate() {
            let key = self.evaluator.resolver().canonical_key(role);
            let role_prefs = prefs.for_role(role, &key);
            let mut domain: Vec<DomainEntry> = candidates
                .iter()
                .enumerate()
                .filter(|(_, candidate)| self.evaluator.satisfies(candidate, &role_prefs, mode))
                .map(|(candidate_idx, candidate)| {
                    let (score, diagnostics) = self.scorer.score(candidate, &role_prefs);
                    DomainEntry {
                        candidate_idx,
                        score,
                        diagnostics,
                    }
                })
                .collect();

            // One unfillable role fails the whole mode.
            if domain.is_empty() {
                tracing::debug!(role = %role, ?mode, "role has an empty domain");
                return Vec::new();
            }

            // Greedy-first exploration: strongest candidates first.
            domain.sort_by(|a, b| b.score.total_cmp(&a.score));
            slots.push(RoleSlot {
                request_pos,
                label: role.clone(),
                domain,
            });
        }

        // Most-constrained-first: smallest domains early reduce branching.
        // The sort is stable, so equally sized domains keep request order.
        slots.sort_by_key(|slot| slot.domain.len());

        // Optimistic bound per suffix of slots: the best isolated score of
        // each remaining role. It ignores role-uniqueness and the group
        // location constraint, so it only ever over-estimates.
        let mut suffix_bound = vec![0.0; slots.len() + 1];
        for i in (0..slots.len()).rev() {
            suffix_bound[i] = suffix_bound[i + 1] + slots[i].domain[0].score;
        }

        let mut search = Search {
            candidates,
            slots: &slots,
            suffix_bound: &suffix_bound,
            evaluator: &self.evaluator,
            prefs,
            mode,
            cohesion_bonus: self.scorer.weights().cohesion_bonus,
            used: HashSet::new(),
            picks: Vec::with_capacity(slots.len()),
            best: BestK::new(limit),
            seq: 0,
        };
        search.descend(0, 0.0);

        let exact = mode == MatchMode::Exact;
        search
            .best
            .into_sorted_desc()
            .into_iter()
            .map(|assignment| self.build_result(candidates, &slots, roles, prefs, assignment, exact))
            .collect()
    }

    fn build_result(
        &self,
        candidates: &[Candidate],
        slots: &[RoleSlot],
        roles: &[String],
        prefs: &Preference,
        assignment: RetainedAssignment,
        exact: bool,
    ) -> BandResult {
        let mut members: Vec<(usize, BandMember)> = assignment
            .picks
            .iter()
            .enumerate()
            .map(|(depth, domain_idx)| {
                let slot = &slots[depth];
                let entry = &slot.domain[*domain_idx];
                let candidate = &candidates[entry.candidate_idx];
                (
                    slot.request_pos,
                    BandMember {
                        role: slot.label.clone(),
                        id: candidate.id.clone(),
                        name: candidate.name.clone(),
                        location: candidate.location.clone(),
                        score: entry.score,
                        diagnostics: entry.diagnostics.clone(),
                        skills: candidate.skills.clone(),
                        traits: candidate.traits.clone(),
                    },
                )
            })
            .collect();
        members.sort_by_key(|(request_pos, _)| *request_pos);

        BandResult {
            score: assignment.score,
            exact,
            roles: roles.to_vec(),
            location_policy: prefs.location_policy,
            members: members.into_iter().map(|(_, member)| member).collect(),
        }
    }
}

/// Transient state owned by one search call. `used` and `picks` are pushed
/// and popped symmetrically on every branch entry and exit.
struct Search<'a> {
    candidates: &'a [Candidate],
    slots: &'a [RoleSlot],
    suffix_bound: &'a [f64],
    evaluator: &'a ConstraintEvaluator,
    prefs: &'a Preference,
    mode: MatchMode,
    cohesion_bonus: f64,
    used: HashSet<String>,
    picks: Vec<usize>,
    best: BestK,
    seq: u64,
}

impl<'a> Search<'a> {
    fn descend(&mut self, depth: usize, acc: f64) {
        let slots = self.slots;
        let candidates = self.candidates;
        if depth == slots.len() {
            self.complete(acc);
            return;
        }

        if self.best.is_full() {
            if let Some(worst) = self.best.worst_score() {
                if acc + self.suffix_bound[depth] <= worst {
                    return;
                }
            }
        }

        let slot = &slots[depth];
        for (domain_idx, entry) in slot.domain.iter().enumerate() {
            let candidate = &candidates[entry.candidate_idx];
            if self.used.contains(candidate.id.as_str()) {
                continue;
            }
            if !self.location_compatible(candidate) {
                continue;
            }
            if self.best.is_full() {
                if let Some(worst) = self.best.worst_score() {
                    if acc + entry.score + self.suffix_bound[depth + 1] <= worst {
                        continue;
                    }
                }
            }

            self.used.insert(candidate.id.clone());
            self.picks.push(domain_idx);
            self.descend(depth + 1, acc + entry.score);
            self.picks.pop();
            self.used.remove(candidate.id.as_str());
        }
    }

    /// Accept a complete assignment: re-verify the location policy, apply
    /// the cohesion bonus, and hand it to the best-K structure.
    fn complete(&mut self, acc: f64) {
        if self.prefs.location_policy == LocationPolicy::AllSame {
            let threshold = self.evaluator.location_threshold(self.mode);
            if !self.assignment_cohesive(threshold) {
                return;
            }
        }

        let mut total = acc;
        // Location cohesion under relaxed thresholds is rewarded whatever
        // the requested policy.
        if self.assignment_cohesive(self.evaluator.location_threshold(MatchMode::Relaxed)) {
            total += self.cohesion_bonus;
        }

        self.seq += 1;
        self.best.offer(RetainedAssignment {
            score: round3(total),
            seq: self.seq,
            picks: self.picks.clone(),
        });
    }

    /// Incremental `all_same` check while the assignment is still partial.
    fn location_compatible(&self, candidate: &Candidate) -> bool {
        if self.prefs.location_policy != LocationPolicy::AllSame {
            return true;
        }
        let threshold = self.evaluator.location_threshold(self.mode);
        let location = candidate.location.as_deref().unwrap_or("");
        if let Some(target) = self.prefs.location.as_deref() {
            return similarity(location, target) >= threshold;
        }
        if self.picks.is_empty() {
            return true;
        }
        similarity(location, self.anchor_location()) >= threshold
    }

    /// Location of the first assigned member, the reference point for the
    /// pairwise variant of `all_same`.
    fn anchor_location(&self) -> &str {
        let entry = &self.slots[0].domain[self.picks[0]];
        self.candidates[entry.candidate_idx]
            .location
            .as_deref()
            .unwrap_or("")
    }

    fn assignment_cohesive(&self, threshold: f64) -> bool {
        let locations: Vec<&str> = self
            .picks
            .iter()
            .enumerate()
            .map(|(depth, domain_idx)| {
                let entry = &self.slots[depth].domain[*domain_idx];
                self.candidates[entry.candidate_idx]
                    .location
                    .as_deref()
                    .unwrap_or("")
            })
            .collect();

        if let Some(target) = self.prefs.location.as_deref() {
            return locations
                .iter()
                .all(|location| similarity(location, target) >= threshold);
        }
        let Some(first) = locations.first() else {
            return true;
        };
        locations
            .iter()
            .skip(1)
            .all(|location| similarity(location, first) >= threshold)
    }
}
