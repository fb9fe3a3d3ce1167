// Core algorithm exports
pub mod alias;
pub mod band;
pub mod constraints;
pub mod matcher;
pub mod rank;
pub mod scoring;
pub mod text;

pub use alias::AliasResolver;
pub use band::BandAssembler;
pub use constraints::{ConstraintEvaluator, MatchMode, TraitMatch};
pub use matcher::{MatchEngine, MatchReport};
pub use rank::CandidateRanker;
pub use scoring::{round3, Scorer};
pub use text::{normalize, similarity};
