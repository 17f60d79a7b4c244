//! Micro-layer orchestration: one ranking request start to finish.
//!
//! Wires profiler → constraint filter → criteria lookup → weight derivation
//! → batch scoring → weighted combination, and hands back every derived
//! number so a reporting layer can reconstruct the analysis without
//! re-deriving anything. The whole pass is synchronous and pure over its
//! inputs; concurrent requests just run independent invocations.

use serde::{Deserialize, Serialize};

use crate::combine::combine;
use crate::criteria::{CriteriaRegistry, CriteriaSet};
use crate::filter::filter;
use crate::model::{
    Alternative, HistoryProfile, QueryConstraints, RankedAlternative, ScoreMatrix, Transaction,
    WeightVector,
};
use crate::profile::profile;
use crate::scoring::{score, RelativeScorer, ScoringStrategy};
use crate::weights::{derive_weights, RuleBasedWeights, WeightStrategy};

/// One ranking request: constraints from the query-understanding
/// collaborator, history and candidates from the data-access collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingRequest {
    pub constraints: QueryConstraints,
    pub history: Vec<Transaction>,
    pub candidates: Vec<Alternative>,
}

/// Everything the ranking derived, sufficient for any renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingReport {
    pub profile: HistoryProfile,
    pub criteria_set: CriteriaSet,
    /// Empty when the constraint filter removed every candidate.
    pub weights: WeightVector,
    pub scores: ScoreMatrix,
    pub ranked: Vec<RankedAlternative>,
    /// Candidates remaining after hard constraint filtering.
    pub filtered_count: usize,
    pub original_count: usize,
}

/// Micro ranking pipeline with pluggable weighting/scoring strategies.
pub struct RankingPipeline<'a> {
    registry: &'a CriteriaRegistry,
    weight_strategy: &'a dyn WeightStrategy,
    scoring_strategy: &'a dyn ScoringStrategy,
}

impl<'a> RankingPipeline<'a> {
    pub fn new(
        registry: &'a CriteriaRegistry,
        weight_strategy: &'a dyn WeightStrategy,
        scoring_strategy: &'a dyn ScoringStrategy,
    ) -> Self {
        Self {
            registry,
            weight_strategy,
            scoring_strategy,
        }
    }

    /// Rank one request. Infallible by design: every degenerate condition
    /// (unknown category, empty history, empty filtered set, strategy
    /// failure) resolves to a documented fallback, not an error.
    pub fn rank(&self, request: &RankingRequest) -> RankingReport {
        let constraints = &request.constraints;
        let user_profile = profile(&request.history, &constraints.category);
        let criteria_set = self.registry.get(&constraints.category).clone();

        let original_count = request.candidates.len();
        let candidates = filter(&request.candidates, constraints);

        // Nothing survived the hard constraints: an empty ranking is the
        // valid terminal state. No weights or scores are meaningful over
        // zero alternatives, so the remaining stages are skipped; the
        // profile still reflects the full history.
        if candidates.is_empty() {
            return RankingReport {
                profile: user_profile,
                criteria_set,
                weights: WeightVector::default(),
                scores: ScoreMatrix::new(),
                ranked: Vec::new(),
                filtered_count: 0,
                original_count,
            };
        }

        let weights = derive_weights(
            &criteria_set,
            constraints,
            &user_profile,
            self.weight_strategy,
        );
        let scores = score(
            &candidates,
            &criteria_set,
            constraints,
            &user_profile,
            self.scoring_strategy,
        );
        let ranked = combine(&candidates, &scores, &weights);

        RankingReport {
            profile: user_profile,
            criteria_set,
            weights,
            scores,
            ranked,
            filtered_count: candidates.len(),
            original_count,
        }
    }
}

/// Pipeline with the builtin registry and default deterministic strategies.
pub fn default_pipeline() -> RankingPipeline<'static> {
    static WEIGHTS: RuleBasedWeights = RuleBasedWeights;
    static SCORER: RelativeScorer = RelativeScorer;
    RankingPipeline::new(CriteriaRegistry::builtin(), &WEIGHTS, &SCORER)
}
