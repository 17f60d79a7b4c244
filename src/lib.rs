#![forbid(unsafe_code)]

//! # ahp-rank
//!
//! Multi-criteria decision core built on the Analytic Hierarchy Process.
//!
//! Two layers share one engine:
//! - **Micro**: rank product candidates for a shopper — derive normalized
//!   criteria weights from purchase history and query constraints, score
//!   candidates relative to the batch, combine into a weighted ranking.
//! - **Macro**: rank strategic alternatives for a vendor — build pairwise
//!   comparison matrices from aggregate customer signals, derive priority
//!   vectors with the eigenvector method, and report consistency ratios.
//!
//! Everything is synchronous, request-scoped, and deterministic. Degenerate
//! inputs (unknown category, empty history, empty candidate set, failed
//! strategies) resolve to documented fallbacks rather than errors; only
//! structurally invalid input (e.g. a non-reciprocal comparison matrix)
//! fails hard.

pub mod bocr;
pub mod combine;
pub mod criteria;
pub mod filter;
pub mod model;
pub mod pairwise;
pub mod pipeline;
pub mod profile;
pub mod scoring;
pub mod strategic;
pub mod strategy;
pub mod weights;

pub use bocr::{bocr, BocrAnalysis};
pub use combine::combine;
pub use criteria::{CriteriaRegistry, CriteriaSet};
pub use filter::filter;
pub use model::{
    Alternative, HistoryProfile, QueryConstraints, RankedAlternative, ScoreMatrix, Transaction,
    WeightVector,
};
pub use pairwise::{priorities, PairwiseError, PairwiseMatrix, Priorities};
pub use pipeline::{default_pipeline, RankingPipeline, RankingReport, RankingRequest};
pub use profile::profile;
pub use scoring::{score, RelativeScorer, ScoringStrategy, DEGENERATE_SCORE};
pub use strategic::{
    analyze, build_comparison_matrix, derive_criteria, ComparisonPolicy, RankedStrategy,
    StrategicAnalysis, StrategicCriterion, StrategicError, StrategicOption, VendorProfile,
};
pub use strategy::{parse_score_response, parse_weight_response, StrategyError};
pub use weights::{derive_weights, RuleBasedWeights, WeightStrategy};
