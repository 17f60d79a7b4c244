//! Batch-relative alternative scoring.
//!
//! Scores are relative to the batch supplied in one call, never absolute:
//! each criterion is min-max normalized against the batch. Cost criteria go
//! through the two-step rule — normalize the raw cost magnitude, then invert
//! — so the cheapest alternative in the batch ends at exactly 1.0. User
//! budget and brand context never touch cost scoring; context shapes how
//! much price *matters* (weights), never how price is *scored*.

use std::collections::HashMap;

use tracing::warn;

use crate::criteria::CriteriaSet;
use crate::model::{Alternative, HistoryProfile, QueryConstraints, ScoreMatrix};
use crate::strategy::StrategyError;

/// Score assigned to every alternative when a criterion's batch min and max
/// coincide (all alternatives tie), and the uniform fallback score when a
/// strategy fails outright.
pub const DEGENERATE_SCORE: f64 = 0.5;

/// One required method: produce the full score matrix for a batch.
pub trait ScoringStrategy {
    fn score(
        &self,
        alternatives: &[Alternative],
        criteria_set: &CriteriaSet,
        constraints: &QueryConstraints,
        profile: &HistoryProfile,
    ) -> Result<ScoreMatrix, StrategyError>;
}

/// Score a batch, absorbing strategy failures into the uniform fallback.
///
/// Cost-criteria inversion is applied here, after the strategy runs, so any
/// plugged-in strategy reports raw normalized magnitudes and cannot get the
/// inversion wrong. The returned matrix always satisfies the `[0, 1]` range
/// contract.
pub fn score(
    alternatives: &[Alternative],
    criteria_set: &CriteriaSet,
    constraints: &QueryConstraints,
    profile: &HistoryProfile,
    strategy: &dyn ScoringStrategy,
) -> ScoreMatrix {
    let raw = match strategy.score(alternatives, criteria_set, constraints, profile) {
        Ok(matrix) if covers_batch(&matrix, alternatives) => matrix,
        Ok(_) => {
            warn!(
                category = %constraints.category,
                "scoring strategy returned an incomplete matrix, falling back to uniform scores"
            );
            uniform_scores(alternatives, criteria_set)
        }
        Err(err) => {
            warn!(
                category = %constraints.category,
                error = %err,
                "scoring strategy failed, falling back to uniform scores"
            );
            uniform_scores(alternatives, criteria_set)
        }
    };

    invert_cost_criteria(raw, alternatives, criteria_set)
}

fn covers_batch(matrix: &ScoreMatrix, alternatives: &[Alternative]) -> bool {
    alternatives.iter().all(|alt| {
        matrix
            .row(&alt.id)
            .is_some_and(|row| row.values().all(|s| s.is_finite() && (0.0..=1.0).contains(s)))
    })
}

/// Flip every cost-criterion score: after this, higher always means more
/// preferred. The cheapest alternative's raw 0.0 becomes 1.0.
fn invert_cost_criteria(
    raw: ScoreMatrix,
    alternatives: &[Alternative],
    criteria_set: &CriteriaSet,
) -> ScoreMatrix {
    let mut out = ScoreMatrix::new();
    for alt in alternatives {
        if let Some(row) = raw.row(&alt.id) {
            for (criterion, &s) in row {
                let s = if criteria_set.is_cost(criterion) { 1.0 - s } else { s };
                out.insert(&alt.id, criterion, s);
            }
        }
    }
    out
}

/// Failure fallback: every alternative gets the same mid-range score on
/// every criterion. The ranking degenerates to weight-independent ties, but
/// the caller still gets a valid matrix.
fn uniform_scores(alternatives: &[Alternative], criteria_set: &CriteriaSet) -> ScoreMatrix {
    let mut matrix = ScoreMatrix::new();
    for alt in alternatives {
        for criterion in &criteria_set.criteria {
            matrix.insert(&alt.id, criterion, DEGENERATE_SCORE);
        }
    }
    matrix
}

/// Default deterministic strategy: per-criterion min-max normalization
/// against the current batch.
///
/// Reports *raw* normalized magnitudes — for cost criteria that means the
/// priciest alternative scores 1.0 here; the inversion happens in [`score`].
#[derive(Debug, Clone, Default)]
pub struct RelativeScorer;

impl ScoringStrategy for RelativeScorer {
    fn score(
        &self,
        alternatives: &[Alternative],
        criteria_set: &CriteriaSet,
        _constraints: &QueryConstraints,
        profile: &HistoryProfile,
    ) -> Result<ScoreMatrix, StrategyError> {
        if alternatives.is_empty() {
            return Err(StrategyError::Execution("empty batch".into()));
        }

        let mut matrix = ScoreMatrix::new();
        for criterion in &criteria_set.criteria {
            let values: Vec<f64> = alternatives
                .iter()
                .map(|alt| raw_value(alt, criterion, profile))
                .collect();
            if values.iter().any(|v| !v.is_finite()) {
                return Err(StrategyError::Execution(format!(
                    "non-finite raw value for criterion {criterion}"
                )));
            }

            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let span = max - min;

            for (alt, &v) in alternatives.iter().zip(&values) {
                // All alternatives tie on this criterion: constant in-range
                // score instead of a division by zero.
                let s = if span > 0.0 { (v - min) / span } else { DEGENERATE_SCORE };
                matrix.insert(&alt.id, criterion, s);
            }
        }
        Ok(matrix)
    }
}

/// Resolve an alternative's raw value for one criterion.
///
/// `price` reads the price field; other criteria read the spec map under the
/// criterion name, then under a small alias table (so `performance` can be
/// backed by `ram_gb` when no composite spec exists). Brand-type criteria
/// with no spec value fall back to the user's observed loyalty for that
/// brand, which is profile signal, not budget signal — the cost-scoring
/// isolation rule only shields price.
fn raw_value(alt: &Alternative, criterion: &str, profile: &HistoryProfile) -> f64 {
    if criterion == "price" {
        return alt.price;
    }
    if let Some(v) = alt.specs.get(criterion) {
        return *v;
    }
    for alias in criterion_aliases(criterion) {
        if let Some(v) = alt.specs.get(*alias) {
            return *v;
        }
    }
    if criterion.starts_with("brand") {
        return profile
            .brand_loyalty
            .get(&alt.brand.to_ascii_lowercase())
            .or_else(|| profile.brand_loyalty.get(&alt.brand))
            .copied()
            .unwrap_or(0.0);
    }
    0.0
}

fn criterion_aliases(criterion: &str) -> &'static [&'static str] {
    match criterion {
        "performance" => &["ram_gb", "cpu_score", "benchmark"],
        "battery_life" => &["battery_hours", "battery_mah"],
        "camera_quality" => &["camera_mp"],
        "storage_capacity" => &["storage_gb"],
        "display_quality" => &["display_nits", "resolution_ppi"],
        "portability" => &["portability_score"],
        _ => &[],
    }
}
