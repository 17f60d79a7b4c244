//! Vendor strategic analysis: the macro AHP layer.
//!
//! Where the micro layer ranks products against numeric attributes, a vendor
//! choosing between strategic options has no direct numbers to compare —
//! only aggregate customer signals. This layer converts those signals into
//! pairwise comparison matrices (one per strategic criterion) through a
//! deterministic rule table, derives priority vectors with the eigenvector
//! method, and combines them into a ranked strategy recommendation.
//!
//! The thresholds and Saaty intensities in [`ComparisonPolicy`] are tunable
//! business policy, not mathematical necessity; the defaults reproduce the
//! documented production values.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pairwise::{priorities, PairwiseError, PairwiseMatrix, Priorities};

/// Customer segment keys used by the aggregate signals.
pub const SEGMENT_BUDGET_CONSCIOUS: &str = "budget_conscious";
pub const SEGMENT_PREMIUM_BUYER: &str = "premium_buyer";
pub const SEGMENT_BRAND_LOYAL: &str = "brand_loyal";

#[derive(Debug, Error, PartialEq)]
pub enum StrategicError {
    #[error("strategic analysis needs at least one alternative")]
    NoAlternatives,
    #[error("strategic analysis needs at least one criterion")]
    NoCriteria,
    #[error(transparent)]
    Pairwise(#[from] PairwiseError),
}

/// The strategic options a vendor can pursue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategicOption {
    /// Expand the budget / low-price product line.
    ExpandBudget,
    /// Invest in premium / high-end products.
    ExpandPremium,
    /// Focus on mid-range value products.
    OptimizeMidrange,
    /// Improve shipping speed and service.
    ImproveLogistics,
    /// Expand product variety / selection.
    IncreaseSelection,
}

impl StrategicOption {
    pub const ALL: [StrategicOption; 5] = [
        StrategicOption::ExpandBudget,
        StrategicOption::ExpandPremium,
        StrategicOption::OptimizeMidrange,
        StrategicOption::ImproveLogistics,
        StrategicOption::IncreaseSelection,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StrategicOption::ExpandBudget => "expand_budget",
            StrategicOption::ExpandPremium => "expand_premium",
            StrategicOption::OptimizeMidrange => "optimize_midrange",
            StrategicOption::ImproveLogistics => "improve_logistics",
            StrategicOption::IncreaseSelection => "increase_selection",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            StrategicOption::ExpandBudget => "Expand budget/low-price product line",
            StrategicOption::ExpandPremium => "Invest in premium/high-end products",
            StrategicOption::OptimizeMidrange => "Focus on mid-range value products",
            StrategicOption::ImproveLogistics => "Improve shipping speed and service",
            StrategicOption::IncreaseSelection => "Expand product variety/selection",
        }
    }
}

/// Aggregated vendor-side view of customer behavior, supplied by the
/// data-access collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorProfile {
    pub vendor_id: String,
    pub vendor_name: String,
    pub category: String,
    /// Fraction of category sales, in `[0, 1]`.
    pub market_share: f64,
    pub avg_conversion_rate: f64,
    pub total_products: usize,
    pub total_sales: usize,
    /// Average criteria weights across this vendor's customers
    /// (criterion → weight).
    pub avg_customer_criteria: HashMap<String, f64>,
    /// Customer segment mix (segment → fraction).
    pub customer_segments: HashMap<String, f64>,
}

impl VendorProfile {
    /// Aggregate price sensitivity: the average weight customers put on the
    /// price criterion.
    pub fn price_sensitivity(&self) -> f64 {
        self.avg_customer_criteria.get("price").copied().unwrap_or(0.0)
    }

    fn segment(&self, key: &str) -> f64 {
        self.customer_segments.get(key).copied().unwrap_or(0.0)
    }
}

/// One strategic criterion with its derived weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategicCriterion {
    pub name: String,
    pub weight: f64,
    pub confidence: f64,
    pub description: String,
}

/// Thresholds and Saaty comparison intensities for matrix construction.
///
/// Every number here is business policy. Deployments tune them; the
/// defaults are the documented production constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonPolicy {
    /// Aggregate price sensitivity above this favors budget expansion.
    pub high_price_sensitivity: f64,
    /// Aggregate price sensitivity below this favors premium expansion.
    pub low_price_sensitivity: f64,
    /// Budget-conscious segment share above this gives budget expansion a
    /// segment edge.
    pub budget_segment_threshold: f64,
    /// Premium + brand-loyal segment share above this gives premium
    /// expansion a segment edge.
    pub premium_segment_threshold: f64,

    /// Intensity of the favored price strategy over its direct opposite.
    pub strong_preference: f64,
    /// Intensity of the favored price strategy over the mid-range option.
    pub moderate_preference: f64,
    /// Intensity of the favored price strategy over everything else.
    pub mild_preference: f64,
    /// Segment-driven advantage intensity.
    pub segment_advantage: f64,
    /// Feasibility advantage of operational options (logistics, selection).
    pub feasibility_advantage: f64,
    /// Financial advantage of premium over budget expansion.
    pub premium_margin_advantage: f64,
    /// Financial advantage of the mid-range option over the rest.
    pub midrange_margin_advantage: f64,
}

impl Default for ComparisonPolicy {
    fn default() -> Self {
        Self {
            high_price_sensitivity: 0.3,
            low_price_sensitivity: 0.15,
            budget_segment_threshold: 0.5,
            premium_segment_threshold: 0.4,
            strong_preference: 5.0,
            moderate_preference: 3.0,
            mild_preference: 2.0,
            segment_advantage: 4.0,
            feasibility_advantage: 3.0,
            premium_margin_advantage: 5.0,
            midrange_margin_advantage: 3.0,
        }
    }
}

/// One entry of the ranked strategy list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedStrategy {
    /// 1-based rank.
    pub rank: usize,
    pub option: StrategicOption,
    /// `Σ_c weight[c] · priority[c][option]`.
    pub score: f64,
    /// Per-criterion priority of this option (pre-weighting).
    pub criteria_scores: HashMap<String, f64>,
    /// Per-criterion `weight · priority` terms summing to `score`.
    pub breakdown: HashMap<String, f64>,
}

/// Full analysis bundle: every matrix, priority vector, and ratio a
/// stakeholder might want to inspect, plus the final ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategicAnalysis {
    pub alternatives: Vec<StrategicOption>,
    pub criteria: Vec<StrategicCriterion>,
    /// Criterion name → row-major comparison matrix.
    pub comparison_matrices: HashMap<String, Vec<Vec<f64>>>,
    /// Criterion name → priority vector (indexed like `alternatives`).
    pub priority_vectors: HashMap<String, Vec<f64>>,
    /// Criterion name → advisory consistency ratio.
    pub consistency_ratios: HashMap<String, f64>,
    /// Combined weighted scores, indexed like `alternatives`.
    pub final_scores: Vec<f64>,
    pub ranked: Vec<RankedStrategy>,
}

/// Convert aggregate customer behavior into weighted strategic criteria.
/// This is where the micro layer's signals steer the macro layer.
pub fn derive_criteria(profile: &VendorProfile) -> Vec<StrategicCriterion> {
    let mut criteria = Vec::with_capacity(5);

    // Market demand: how much of the customers' stated preference mass sits
    // on demand-side criteria.
    let demand_mass: f64 = profile
        .avg_customer_criteria
        .iter()
        .filter(|(k, _)| matches!(k.as_str(), "price" | "performance" | "quality"))
        .map(|(_, v)| v)
        .sum();
    let demand_weight = demand_mass / profile.avg_customer_criteria.len().max(1) as f64;
    criteria.push(StrategicCriterion {
        name: "market_demand".to_string(),
        weight: demand_weight,
        confidence: 0.8,
        description: "Alignment with customer preferences".to_string(),
    });

    // Segment opportunity: more meaningfully-sized segments, more room to
    // target, capped at 0.3.
    let segment_diversity = profile
        .customer_segments
        .values()
        .filter(|v| **v > 0.1)
        .count();
    criteria.push(StrategicCriterion {
        name: "segment_opportunity".to_string(),
        weight: (segment_diversity as f64 * 0.1).min(0.3),
        confidence: 0.85,
        description: "Size of target customer segment".to_string(),
    });

    criteria.push(StrategicCriterion {
        name: "competitive_position".to_string(),
        weight: profile.market_share * 0.5 + profile.avg_conversion_rate * 0.5,
        confidence: 0.9,
        description: "Current market strength".to_string(),
    });

    criteria.push(StrategicCriterion {
        name: "operational_feasibility".to_string(),
        weight: 0.2,
        confidence: 0.7,
        description: "Ease of implementation".to_string(),
    });

    criteria.push(StrategicCriterion {
        name: "financial_impact".to_string(),
        weight: 0.25,
        confidence: 0.75,
        description: "Expected profitability".to_string(),
    });

    let total: f64 = criteria.iter().map(|c| c.weight).sum();
    if total > 0.0 {
        for c in &mut criteria {
            c.weight /= total;
        }
    }
    criteria
}

/// Build the pairwise comparison matrix for one criterion.
///
/// Only the upper triangle is ruled on; the lower triangle is filled with
/// exact reciprocals, so the matrix satisfies the reciprocal invariant by
/// construction. For a pair where neither direction has a rule, the
/// comparison is indifferent (1).
pub fn build_comparison_matrix(
    alternatives: &[StrategicOption],
    criterion: &str,
    profile: &VendorProfile,
    policy: &ComparisonPolicy,
) -> Result<PairwiseMatrix, PairwiseError> {
    PairwiseMatrix::from_upper_triangle(alternatives.len(), |i, j| {
        let a = alternatives[i];
        let b = alternatives[j];
        if let Some(v) = dominance(a, b, criterion, profile, policy) {
            v
        } else if let Some(v) = dominance(b, a, criterion, profile, policy) {
            1.0 / v
        } else {
            1.0
        }
    })
}

/// Rule table: intensity with which option `a` beats option `b` under one
/// criterion, if any rule applies.
fn dominance(
    a: StrategicOption,
    b: StrategicOption,
    criterion: &str,
    profile: &VendorProfile,
    policy: &ComparisonPolicy,
) -> Option<f64> {
    use StrategicOption::*;

    match criterion {
        "market_demand" => {
            let ps = profile.price_sensitivity();
            if a == ExpandBudget && ps > policy.high_price_sensitivity {
                Some(match b {
                    ExpandPremium => policy.strong_preference,
                    OptimizeMidrange => policy.moderate_preference,
                    _ => policy.mild_preference,
                })
            } else if a == ExpandPremium && ps < policy.low_price_sensitivity {
                Some(match b {
                    ExpandBudget => policy.strong_preference,
                    OptimizeMidrange => policy.moderate_preference,
                    _ => policy.mild_preference,
                })
            } else {
                None
            }
        }
        "segment_opportunity" => {
            let budget_share = profile.segment(SEGMENT_BUDGET_CONSCIOUS);
            let premium_share =
                profile.segment(SEGMENT_PREMIUM_BUYER) + profile.segment(SEGMENT_BRAND_LOYAL);
            if a == ExpandBudget && budget_share > policy.budget_segment_threshold {
                Some(policy.segment_advantage)
            } else if a == ExpandPremium && premium_share > policy.premium_segment_threshold {
                Some(policy.segment_advantage)
            } else {
                None
            }
        }
        "financial_impact" => {
            if a == ExpandPremium && b == ExpandBudget {
                Some(policy.premium_margin_advantage)
            } else if a == OptimizeMidrange {
                Some(policy.midrange_margin_advantage)
            } else {
                None
            }
        }
        "operational_feasibility" => {
            let operational = |o: StrategicOption| matches!(o, ImproveLogistics | IncreaseSelection);
            // Two operational options against each other are indifferent.
            if operational(a) && !operational(b) {
                Some(policy.feasibility_advantage)
            } else {
                None
            }
        }
        // competitive_position and any unknown criterion: no dominance
        // rules, indifferent matrix.
        _ => None,
    }
}

/// Run the full strategic analysis for one vendor.
pub fn analyze(
    profile: &VendorProfile,
    policy: &ComparisonPolicy,
) -> Result<StrategicAnalysis, StrategicError> {
    let alternatives = StrategicOption::ALL.to_vec();
    analyze_alternatives(&alternatives, profile, policy)
}

/// [`analyze`] over a caller-chosen alternative set.
pub fn analyze_alternatives(
    alternatives: &[StrategicOption],
    profile: &VendorProfile,
    policy: &ComparisonPolicy,
) -> Result<StrategicAnalysis, StrategicError> {
    if alternatives.is_empty() {
        return Err(StrategicError::NoAlternatives);
    }
    let criteria = derive_criteria(profile);
    if criteria.is_empty() {
        return Err(StrategicError::NoCriteria);
    }

    let n = alternatives.len();
    let mut comparison_matrices = HashMap::with_capacity(criteria.len());
    let mut priority_vectors = HashMap::with_capacity(criteria.len());
    let mut consistency_ratios = HashMap::with_capacity(criteria.len());
    let mut final_scores = vec![0.0; n];

    for criterion in &criteria {
        let matrix = build_comparison_matrix(alternatives, &criterion.name, profile, policy)?;
        let Priorities {
            vector,
            consistency_ratio,
            ..
        } = priorities(&matrix);

        for (score, p) in final_scores.iter_mut().zip(&vector) {
            *score += criterion.weight * p;
        }
        comparison_matrices.insert(criterion.name.clone(), matrix.to_rows());
        priority_vectors.insert(criterion.name.clone(), vector);
        consistency_ratios.insert(criterion.name.clone(), consistency_ratio);
    }

    // Stable descending sort over alternative indices: ties keep the
    // declared alternative order.
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| final_scores[b].total_cmp(&final_scores[a]));

    let ranked = order
        .iter()
        .enumerate()
        .map(|(rank, &idx)| {
            let criteria_scores: HashMap<String, f64> = criteria
                .iter()
                .map(|c| (c.name.clone(), priority_vectors[&c.name][idx]))
                .collect();
            let breakdown: HashMap<String, f64> = criteria
                .iter()
                .map(|c| (c.name.clone(), c.weight * priority_vectors[&c.name][idx]))
                .collect();
            RankedStrategy {
                rank: rank + 1,
                option: alternatives[idx],
                score: final_scores[idx],
                criteria_scores,
                breakdown,
            }
        })
        .collect();

    Ok(StrategicAnalysis {
        alternatives: alternatives.to_vec(),
        criteria,
        comparison_matrices,
        priority_vectors,
        consistency_ratios,
        final_scores,
        ranked,
    })
}
