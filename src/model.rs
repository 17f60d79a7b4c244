//! Request-scoped data types shared across the ranking pipeline.
//!
//! Everything here is plain owned data: constructed from collaborator input,
//! consumed within one ranking or analysis call, then dropped. Nothing is
//! cached or shared across requests.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

/// A candidate entity being ranked: a product in the micro layer, keyed by a
/// stable identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub id: String,
    pub name: String,
    pub category: String,
    pub brand: String,
    /// Raw price in the request currency. Feeds the cost criterion.
    pub price: f64,
    /// Numeric spec attributes usable by criteria (e.g. `ram_gb`, `camera_mp`).
    #[serde(default)]
    pub specs: HashMap<String, f64>,
}

/// One historical purchase record, reduced to the fields the profiler needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub total_paid: f64,
    pub brand: String,
    #[serde(default)]
    pub specs: HashMap<String, f64>,
}

/// Structured constraints handed over by the query-understanding collaborator.
///
/// A collaborator that cannot parse its input still hands over a well-formed
/// value with everything defaulted; a missing constraint is never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryConstraints {
    pub category: String,
    #[serde(default)]
    pub budget_min: Option<f64>,
    #[serde(default)]
    pub budget_max: Option<f64>,
    #[serde(default)]
    pub use_case: Option<String>,
    #[serde(default)]
    pub must_have: BTreeSet<String>,
    #[serde(default)]
    pub nice_to_have: BTreeSet<String>,
    #[serde(default)]
    pub brand_preference: Option<String>,
}

impl Default for QueryConstraints {
    fn default() -> Self {
        Self {
            category: "general".to_string(),
            budget_min: None,
            budget_max: None,
            use_case: None,
            must_have: BTreeSet::new(),
            nice_to_have: BTreeSet::new(),
            brand_preference: None,
        }
    }
}

impl QueryConstraints {
    pub fn for_category(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..Self::default()
        }
    }
}

/// Preference summary reduced from a user's purchase history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryProfile {
    /// 1 − min(stddev(prices)/mean, 1): low spend variance reads as a
    /// consistent budget, hence high sensitivity. In `[0, 1]`.
    pub price_sensitivity: f64,
    pub avg_price: f64,
    /// Fraction of past purchases per observed brand; sums to 1 when any
    /// history exists, empty otherwise.
    pub brand_loyalty: HashMap<String, f64>,
    /// Category-specific spec averages (e.g. `avg_ram` for laptops).
    pub spec_preferences: HashMap<String, f64>,
    pub sample_size: usize,
}

impl HistoryProfile {
    /// Neutral prior used when a user has no history. Not an error state.
    pub fn neutral() -> Self {
        Self {
            price_sensitivity: 0.5,
            avg_price: 0.0,
            brand_loyalty: HashMap::new(),
            spec_preferences: HashMap::new(),
            sample_size: 0,
        }
    }

    /// Strongest single-brand loyalty fraction, if any history exists.
    pub fn dominant_brand(&self) -> Option<(&str, f64)> {
        self.brand_loyalty
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(brand, share)| (brand.as_str(), *share))
    }
}

/// Normalized criteria weights for one request: Σ = 1 (± float tolerance),
/// every weight ≥ 0. Never mutated after derivation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeightVector {
    weights: HashMap<String, f64>,
}

impl WeightVector {
    /// Normalize raw positive weights over exactly `criteria`.
    ///
    /// Criteria missing from `raw` enter at 0 before normalization. Returns
    /// `None` when no criterion ends up with positive mass, letting the
    /// caller pick its documented fallback.
    pub fn normalized(criteria: &[String], raw: &HashMap<String, f64>) -> Option<Self> {
        let mut weights = HashMap::with_capacity(criteria.len());
        let mut total = 0.0;
        for criterion in criteria {
            let w = raw.get(criterion).copied().unwrap_or(0.0);
            if !w.is_finite() || w < 0.0 {
                return None;
            }
            total += w;
            weights.insert(criterion.clone(), w);
        }
        if total <= 0.0 {
            return None;
        }
        for w in weights.values_mut() {
            *w /= total;
        }
        Some(Self { weights })
    }

    /// Equal weights `1/n` for every criterion. The documented fallback when
    /// derivation cannot produce a usable result.
    pub fn uniform(criteria: &[String]) -> Self {
        let n = criteria.len().max(1);
        let w = 1.0 / n as f64;
        Self {
            weights: criteria.iter().map(|c| (c.clone(), w)).collect(),
        }
    }

    pub fn get(&self, criterion: &str) -> f64 {
        self.weights.get(criterion).copied().unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn sum(&self) -> f64 {
        self.weights.values().sum()
    }
}

/// Per-alternative, per-criterion scores in `[0, 1]`.
///
/// Cost criteria are stored already inverted: after construction, higher
/// always means more preferred, for every criterion.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreMatrix {
    scores: HashMap<String, HashMap<String, f64>>,
}

impl ScoreMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, alternative_id: &str, criterion: &str, score: f64) {
        self.scores
            .entry(alternative_id.to_string())
            .or_default()
            .insert(criterion.to_string(), score);
    }

    pub fn get(&self, alternative_id: &str, criterion: &str) -> Option<f64> {
        self.scores.get(alternative_id)?.get(criterion).copied()
    }

    pub fn row(&self, alternative_id: &str) -> Option<&HashMap<String, f64>> {
        self.scores.get(alternative_id)
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }
}

/// One entry of the final ranking, with enough breakdown for a renderer to
/// reconstruct every number without re-deriving anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedAlternative {
    pub alternative: Alternative,
    /// `Σ_c weight[c] · score[c]` over the criteria set.
    pub final_score: f64,
    /// Per-criterion `weight · score` terms summing to `final_score`.
    pub contributions: HashMap<String, f64>,
}
