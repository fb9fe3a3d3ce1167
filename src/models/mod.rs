// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Candidate, LocationPolicy, MatchThresholds, Preference, RolePreference, ScoringWeights,
    SkillEntry,
};
pub use requests::MatchRequest;
pub use responses::{
    BandMember, BandResult, MatchDiagnostics, MatchResponse, MatchResults, RankedCandidate,
    SkillMatchDetail,
};
