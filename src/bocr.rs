//! Benefits / Opportunities / Costs / Risks breakdown for a chosen strategy.
//!
//! A lightweight companion to the strategic ranking: once AHP picks a top
//! strategy, this sketches its BOCR profile so a reporting layer can show
//! stakeholders what the recommendation trades off. Factor values are fixed
//! editorial judgments except where a customer-segment share directly scales
//! a factor.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::strategic::{
    StrategicOption, VendorProfile, SEGMENT_BUDGET_CONSCIOUS, SEGMENT_PREMIUM_BUYER,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BocrAnalysis {
    pub option: StrategicOption,
    pub benefits: HashMap<String, f64>,
    pub opportunities: HashMap<String, f64>,
    pub costs: HashMap<String, f64>,
    pub risks: HashMap<String, f64>,
    pub total_benefits: f64,
    pub total_opportunities: f64,
    pub total_costs: f64,
    pub total_risks: f64,
    /// `benefits + opportunities − costs − risks`.
    pub net_score: f64,
}

/// Build the BOCR breakdown for one strategy.
///
/// Only the budget and premium expansion strategies have detailed factor
/// tables; other strategies get a generic single-factor sketch.
pub fn bocr(option: StrategicOption, profile: &VendorProfile) -> BocrAnalysis {
    let segment = |key: &str| profile.customer_segments.get(key).copied().unwrap_or(0.0);

    let (benefits, opportunities, costs, risks) = match option {
        StrategicOption::ExpandBudget => (
            factors(&[
                ("large_market", segment(SEGMENT_BUDGET_CONSCIOUS)),
                ("high_volume", 0.8),
                ("brand_awareness", 0.6),
            ]),
            factors(&[
                ("market_penetration", 0.85),
                ("customer_acquisition", 0.9),
                ("economies_of_scale", 0.7),
            ]),
            factors(&[
                ("thin_margins", 0.9),
                ("inventory_risk", 0.6),
                ("brand_dilution", 0.4),
            ]),
            factors(&[
                ("price_war", 0.8),
                ("quality_perception", 0.5),
                ("margin_pressure", 0.85),
            ]),
        ),
        StrategicOption::ExpandPremium => (
            factors(&[
                ("high_margins", 0.95),
                ("brand_prestige", 0.8),
                ("customer_loyalty", 0.75),
            ]),
            factors(&[
                ("market_differentiation", 0.85),
                ("premium_segment_growth", segment(SEGMENT_PREMIUM_BUYER)),
                ("upsell_potential", 0.7),
            ]),
            factors(&[
                ("product_development", 0.85),
                ("marketing_investment", 0.8),
                ("quality_assurance", 0.75),
            ]),
            factors(&[
                (
                    // Unknown premium share reads as a modest 0.2 market.
                    "limited_market",
                    1.0 - profile
                        .customer_segments
                        .get(SEGMENT_PREMIUM_BUYER)
                        .copied()
                        .unwrap_or(0.2),
                ),
                ("competition_intensity", 0.7),
                ("economic_sensitivity", 0.6),
            ]),
        ),
        _ => (
            factors(&[("expected_benefit", 0.7)]),
            factors(&[("expected_opportunity", 0.7)]),
            factors(&[("expected_cost", 0.6)]),
            factors(&[("expected_risk", 0.6)]),
        ),
    };

    let total_benefits: f64 = benefits.values().sum();
    let total_opportunities: f64 = opportunities.values().sum();
    let total_costs: f64 = costs.values().sum();
    let total_risks: f64 = risks.values().sum();

    BocrAnalysis {
        option,
        benefits,
        opportunities,
        costs,
        risks,
        total_benefits,
        total_opportunities,
        total_costs,
        total_risks,
        net_score: total_benefits + total_opportunities - total_costs - total_risks,
    }
}

fn factors(entries: &[(&str, f64)]) -> HashMap<String, f64> {
    entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vendor(segments: &[(&str, f64)]) -> VendorProfile {
        VendorProfile {
            vendor_id: "vnd".to_string(),
            vendor_name: "Vendor".to_string(),
            category: "laptops".to_string(),
            market_share: 0.2,
            avg_conversion_rate: 0.1,
            total_products: 10,
            total_sales: 100,
            avg_customer_criteria: HashMap::new(),
            customer_segments: segments.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    #[test]
    fn budget_bocr_scales_market_benefit_with_segment_share() {
        let analysis = bocr(
            StrategicOption::ExpandBudget,
            &vendor(&[(SEGMENT_BUDGET_CONSCIOUS, 0.6)]),
        );
        assert!((analysis.benefits["large_market"] - 0.6).abs() < 1e-12);
        assert!((analysis.total_benefits - (0.6 + 0.8 + 0.6)).abs() < 1e-9);
        let expected_net = analysis.total_benefits + analysis.total_opportunities
            - analysis.total_costs
            - analysis.total_risks;
        assert!((analysis.net_score - expected_net).abs() < 1e-12);
    }

    #[test]
    fn premium_bocr_limits_market_risk_by_segment() {
        let analysis = bocr(
            StrategicOption::ExpandPremium,
            &vendor(&[(SEGMENT_PREMIUM_BUYER, 0.5)]),
        );
        assert!((analysis.risks["limited_market"] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn other_strategies_get_generic_sketch() {
        let analysis = bocr(StrategicOption::ImproveLogistics, &vendor(&[]));
        assert_eq!(analysis.benefits.len(), 1);
        assert!((analysis.net_score - (0.7 + 0.7 - 0.6 - 0.6)).abs() < 1e-12);
    }
}
