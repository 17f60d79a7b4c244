use std::collections::HashMap;

use ahp_rank::strategic::{SEGMENT_BRAND_LOYAL, SEGMENT_BUDGET_CONSCIOUS, SEGMENT_PREMIUM_BUYER};
use ahp_rank::{analyze, bocr, ComparisonPolicy, StrategicOption, VendorProfile};

fn vendor_profile(
    price_weight: f64,
    segments: &[(&str, f64)],
    market_share: f64,
) -> VendorProfile {
    let mut avg_customer_criteria = HashMap::new();
    avg_customer_criteria.insert("price".to_string(), price_weight);
    avg_customer_criteria.insert("performance".to_string(), 0.25);
    avg_customer_criteria.insert("battery_life".to_string(), 0.15);
    avg_customer_criteria.insert("brand_reputation".to_string(), 0.1);

    VendorProfile {
        vendor_id: "vnd_techbuy".to_string(),
        vendor_name: "TechBuy Electronics".to_string(),
        category: "laptops".to_string(),
        market_share,
        avg_conversion_rate: 0.18,
        total_products: 52,
        total_sales: 4100,
        avg_customer_criteria,
        customer_segments: segments.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
    }
}

#[test]
fn budget_heavy_customer_base_yields_budget_expansion() {
    let profile = vendor_profile(
        0.45,
        &[
            (SEGMENT_BUDGET_CONSCIOUS, 0.65),
            (SEGMENT_PREMIUM_BUYER, 0.1),
            (SEGMENT_BRAND_LOYAL, 0.15),
        ],
        0.3,
    );
    let analysis = analyze(&profile, &ComparisonPolicy::default()).unwrap();

    assert_eq!(analysis.ranked[0].option, StrategicOption::ExpandBudget);
    assert_eq!(analysis.ranked[0].rank, 1);

    // Final scores form a distribution: each per-criterion priority vector
    // sums to 1 and the criteria weights sum to 1, so the weighted
    // combination does too.
    let total: f64 = analysis.final_scores.iter().sum();
    assert!((total - 1.0).abs() < 1e-6);
}

#[test]
fn premium_segment_flips_the_recommendation() {
    let profile = vendor_profile(
        0.1,
        &[
            (SEGMENT_BUDGET_CONSCIOUS, 0.1),
            (SEGMENT_PREMIUM_BUYER, 0.35),
            (SEGMENT_BRAND_LOYAL, 0.25),
        ],
        0.3,
    );
    let analysis = analyze(&profile, &ComparisonPolicy::default()).unwrap();
    assert_eq!(analysis.ranked[0].option, StrategicOption::ExpandPremium);
}

#[test]
fn analysis_bundle_lets_a_renderer_verify_everything() {
    let profile = vendor_profile(0.4, &[(SEGMENT_BUDGET_CONSCIOUS, 0.6)], 0.25);
    let analysis = analyze(&profile, &ComparisonPolicy::default()).unwrap();

    assert_eq!(analysis.alternatives.len(), 5);
    assert_eq!(analysis.criteria.len(), 5);

    for criterion in &analysis.criteria {
        let matrix = &analysis.comparison_matrices[&criterion.name];
        let n = analysis.alternatives.len();
        assert_eq!(matrix.len(), n);

        // Reciprocal invariant on the published rows.
        for i in 0..n {
            assert!((matrix[i][i] - 1.0).abs() < 1e-12);
            for j in 0..n {
                assert!(matrix[i][j] > 0.0);
                assert!((matrix[i][j] * matrix[j][i] - 1.0).abs() < 1e-9);
            }
        }

        let vector = &analysis.priority_vectors[&criterion.name];
        assert_eq!(vector.len(), n);
        assert!((vector.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(vector.iter().all(|p| *p >= 0.0));

        // CR is advisory: present and non-negative, never gating.
        assert!(analysis.consistency_ratios[&criterion.name] >= 0.0);
    }

    // The rule tables encode near-consistent ladders (5/3/2), so demand
    // matrices stay within the conventional acceptability band.
    assert!(analysis.consistency_ratios["market_demand"] < 0.1);

    // Ranked scores match final_scores through the alternatives index.
    for entry in &analysis.ranked {
        let idx = analysis
            .alternatives
            .iter()
            .position(|o| *o == entry.option)
            .unwrap();
        assert!((analysis.final_scores[idx] - entry.score).abs() < 1e-12);
    }
}

#[test]
fn policy_thresholds_are_tunable_business_constants() {
    let profile = vendor_profile(0.2, &[(SEGMENT_BUDGET_CONSCIOUS, 0.6)], 0.25);

    // Default thresholds: 0.2 sensitivity triggers no demand rule.
    let default_run = analyze(&profile, &ComparisonPolicy::default()).unwrap();
    let demand = &default_run.comparison_matrices["market_demand"];
    assert!((demand[0][1] - 1.0).abs() < 1e-12);

    // Lowering the threshold makes the same vendor read as price-driven.
    let tuned = ComparisonPolicy {
        high_price_sensitivity: 0.1,
        ..ComparisonPolicy::default()
    };
    let tuned_run = analyze(&profile, &tuned).unwrap();
    let demand = &tuned_run.comparison_matrices["market_demand"];
    assert!((demand[0][1] - tuned.strong_preference).abs() < 1e-12);
}

#[test]
fn bocr_follows_the_recommended_strategy() {
    let profile = vendor_profile(0.45, &[(SEGMENT_BUDGET_CONSCIOUS, 0.7)], 0.3);
    let analysis = analyze(&profile, &ComparisonPolicy::default()).unwrap();
    let top = analysis.ranked[0].option;

    let breakdown = bocr(top, &profile);
    assert_eq!(breakdown.option, top);
    assert!((breakdown.net_score
        - (breakdown.total_benefits + breakdown.total_opportunities
            - breakdown.total_costs
            - breakdown.total_risks))
        .abs()
        < 1e-12);
    // Budget strategy's market benefit scales with the segment share.
    assert!((breakdown.benefits["large_market"] - 0.7).abs() < 1e-12);
}
