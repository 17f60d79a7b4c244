//! Criteria weight derivation: blend history signal with query requirements.
//!
//! The blending policy is a strategy seam. The default [`RuleBasedWeights`]
//! engine applies deterministic boosts; a deployment can swap in any other
//! strategy (e.g. one backed by a text-generation call parsed through
//! [`crate::strategy::parse_weight_response`]). Whatever the strategy does,
//! the postcondition here is enforced unconditionally: weights are
//! renormalized over exactly the criteria of the set, and any failure to
//! produce a usable result degrades to uniform weights — never to an error.

use std::collections::HashMap;

use tracing::warn;

use crate::criteria::CriteriaSet;
use crate::model::{HistoryProfile, QueryConstraints, WeightVector};
use crate::strategy::StrategyError;

/// Price-sensitivity level above which the price criterion gets boosted.
pub const PRICE_SENSITIVITY_BOOST_THRESHOLD: f64 = 0.7;
/// Single-brand loyalty fraction above which brand-type criteria get boosted.
pub const BRAND_LOYALTY_BOOST_THRESHOLD: f64 = 0.5;

/// Multiplier applied to a boosted criterion's base weight.
const BOOST: f64 = 2.0;
/// Smaller multiplier for nice-to-have driven boosts.
const SOFT_BOOST: f64 = 1.5;

/// One required method: propose raw (pre-normalization) weights.
pub trait WeightStrategy {
    fn propose(
        &self,
        criteria_set: &CriteriaSet,
        constraints: &QueryConstraints,
        profile: &HistoryProfile,
    ) -> Result<HashMap<String, f64>, StrategyError>;
}

/// Derive the normalized weight vector for one request.
///
/// This is the only public entry point; it wraps the strategy with the
/// normalization postcondition and the uniform-weights fallback.
pub fn derive_weights(
    criteria_set: &CriteriaSet,
    constraints: &QueryConstraints,
    profile: &HistoryProfile,
    strategy: &dyn WeightStrategy,
) -> WeightVector {
    match strategy.propose(criteria_set, constraints, profile) {
        Ok(raw) => match WeightVector::normalized(&criteria_set.criteria, &raw) {
            Some(weights) => weights,
            None => {
                warn!(
                    category = %constraints.category,
                    "weight strategy produced unusable output, falling back to uniform weights"
                );
                WeightVector::uniform(&criteria_set.criteria)
            }
        },
        Err(err) => {
            warn!(
                category = %constraints.category,
                error = %err,
                "weight strategy failed, falling back to uniform weights"
            );
            WeightVector::uniform(&criteria_set.criteria)
        }
    }
}

/// Deterministic rule engine reproducing the documented blending intents.
///
/// Every criterion starts from an equal base; the rules multiply boosts onto
/// criteria tied to the strongest signals. Normalization afterwards turns
/// the multipliers into relative emphasis.
#[derive(Debug, Clone, Default)]
pub struct RuleBasedWeights;

impl WeightStrategy for RuleBasedWeights {
    fn propose(
        &self,
        criteria_set: &CriteriaSet,
        constraints: &QueryConstraints,
        profile: &HistoryProfile,
    ) -> Result<HashMap<String, f64>, StrategyError> {
        if criteria_set.is_empty() {
            return Err(StrategyError::Execution("empty criteria set".into()));
        }

        let mut weights: HashMap<String, f64> = criteria_set
            .criteria
            .iter()
            .map(|c| (c.clone(), 1.0))
            .collect();

        // Rule 1: strong price sensitivity emphasizes the price criterion.
        if profile.price_sensitivity > PRICE_SENSITIVITY_BOOST_THRESHOLD {
            boost(&mut weights, "price", BOOST);
        }

        // Rule 2: a stated use case emphasizes semantically tied criteria.
        if let Some(use_case) = &constraints.use_case {
            for criterion in criteria_for_use_case(use_case) {
                boost(&mut weights, criterion, BOOST);
            }
        }

        // Rule 3: dominant single-brand loyalty emphasizes brand criteria.
        if let Some((_, share)) = profile.dominant_brand() {
            if share > BRAND_LOYALTY_BOOST_THRESHOLD {
                for criterion in &criteria_set.criteria {
                    if criterion.starts_with("brand") {
                        boost(&mut weights, criterion, BOOST);
                    }
                }
            }
        }

        // Rule 4: must-have features emphasize the criteria they map to;
        // nice-to-haves get a softer push.
        for feature in &constraints.must_have {
            for criterion in criteria_for_feature(feature) {
                boost(&mut weights, criterion, BOOST);
            }
        }
        for feature in &constraints.nice_to_have {
            for criterion in criteria_for_feature(feature) {
                boost(&mut weights, criterion, SOFT_BOOST);
            }
        }

        Ok(weights)
    }
}

fn boost(weights: &mut HashMap<String, f64>, criterion: &str, factor: f64) {
    // Boosts only apply to criteria actually in the set.
    if let Some(w) = weights.get_mut(criterion) {
        *w *= factor;
    }
}

/// Use-case → emphasized criteria. Same spirit as the category criteria
/// table: small, exact-match, extensible.
fn criteria_for_use_case(use_case: &str) -> &'static [&'static str] {
    match use_case.to_ascii_lowercase().as_str() {
        "gaming" => &["performance", "display_quality"],
        "work" | "business" => &["performance", "battery_life", "portability"],
        "travel" => &["portability", "battery_life", "comfort", "durability"],
        "photography" => &["camera_quality", "storage_capacity"],
        "casual" => &["price", "comfort", "style"],
        _ => &[],
    }
}

/// Feature keyword → emphasized criteria, for must-have/nice-to-have sets.
fn criteria_for_feature(feature: &str) -> &'static [&'static str] {
    let f = feature.to_ascii_lowercase();
    if f.contains("battery") {
        &["battery_life"]
    } else if f.contains("performance") || f.contains("gpu") || f.contains("ram") || f.contains("fast")
    {
        &["performance"]
    } else if f.contains("camera") {
        &["camera_quality"]
    } else if f.contains("screen") || f.contains("display") {
        &["display_quality"]
    } else if f.contains("light") || f.contains("portab") {
        &["portability"]
    } else if f.contains("storage") {
        &["storage_capacity"]
    } else if f.contains("cheap") || f.contains("budget") {
        &["price"]
    } else if f.contains("organic") {
        &["organic_certification"]
    } else if f.contains("comfort") {
        &["comfort"]
    } else if f.contains("durab") {
        &["durability"]
    } else {
        &[]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::CriteriaRegistry;

    struct FailingStrategy;
    impl WeightStrategy for FailingStrategy {
        fn propose(
            &self,
            _: &CriteriaSet,
            _: &QueryConstraints,
            _: &HistoryProfile,
        ) -> Result<HashMap<String, f64>, StrategyError> {
            Err(StrategyError::Execution("upstream judge unavailable".into()))
        }
    }

    struct MalformedStrategy;
    impl WeightStrategy for MalformedStrategy {
        fn propose(
            &self,
            _: &CriteriaSet,
            _: &QueryConstraints,
            _: &HistoryProfile,
        ) -> Result<HashMap<String, f64>, StrategyError> {
            let mut raw = HashMap::new();
            raw.insert("price".to_string(), f64::NAN);
            Ok(raw)
        }
    }

    fn laptops() -> &'static CriteriaSet {
        CriteriaRegistry::builtin().get("laptops")
    }

    #[test]
    fn derived_weights_always_sum_to_one() {
        let mut constraints = QueryConstraints::for_category("laptops");
        constraints.use_case = Some("gaming".to_string());
        constraints.must_have.insert("long battery life".to_string());
        let mut profile = HistoryProfile::neutral();
        profile.price_sensitivity = 0.9;

        let wv = derive_weights(laptops(), &constraints, &profile, &RuleBasedWeights);
        assert!((wv.sum() - 1.0).abs() < 1e-6);
        for (_, w) in wv.iter() {
            assert!(w >= 0.0);
        }
    }

    #[test]
    fn price_sensitivity_boosts_price_over_base() {
        let constraints = QueryConstraints::for_category("laptops");
        let mut sensitive = HistoryProfile::neutral();
        sensitive.price_sensitivity = 0.9;

        let boosted = derive_weights(laptops(), &constraints, &sensitive, &RuleBasedWeights);
        let neutral = derive_weights(
            laptops(),
            &constraints,
            &HistoryProfile::neutral(),
            &RuleBasedWeights,
        );
        assert!(boosted.get("price") > neutral.get("price"));
    }

    #[test]
    fn gaming_use_case_boosts_performance() {
        let mut constraints = QueryConstraints::for_category("laptops");
        constraints.use_case = Some("gaming".to_string());
        let wv = derive_weights(
            laptops(),
            &constraints,
            &HistoryProfile::neutral(),
            &RuleBasedWeights,
        );
        assert!(wv.get("performance") > wv.get("battery_life"));
        assert!(wv.get("display_quality") > wv.get("portability"));
    }

    #[test]
    fn dominant_brand_loyalty_boosts_brand_criteria() {
        let constraints = QueryConstraints::for_category("laptops");
        let mut profile = HistoryProfile::neutral();
        profile.brand_loyalty.insert("apple".to_string(), 0.8);
        profile.brand_loyalty.insert("dell".to_string(), 0.2);

        let wv = derive_weights(laptops(), &constraints, &profile, &RuleBasedWeights);
        assert!(wv.get("brand_reputation") > wv.get("portability"));
    }

    #[test]
    fn strategy_failure_falls_back_to_uniform() {
        let constraints = QueryConstraints::for_category("laptops");
        let profile = HistoryProfile::neutral();

        let wv = derive_weights(laptops(), &constraints, &profile, &FailingStrategy);
        for c in &laptops().criteria {
            assert!((wv.get(c) - 1.0 / 6.0).abs() < 1e-9);
        }

        let wv = derive_weights(laptops(), &constraints, &profile, &MalformedStrategy);
        assert!((wv.sum() - 1.0).abs() < 1e-6);
        assert!((wv.get("price") - 1.0 / 6.0).abs() < 1e-9);
    }
}
