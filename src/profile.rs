//! History profiling: reduce past transactions into a preference summary.

use std::collections::HashMap;

use crate::model::{HistoryProfile, Transaction};

/// Build a [`HistoryProfile`] from a user's transactions for one category.
///
/// Empty history yields the neutral sentinel profile rather than an error:
/// ranking still proceeds, just without personalization signal.
pub fn profile(transactions: &[Transaction], category: &str) -> HistoryProfile {
    if transactions.is_empty() {
        return HistoryProfile::neutral();
    }

    let n = transactions.len();
    let prices: Vec<f64> = transactions.iter().map(|t| t.total_paid).collect();
    let avg_price = prices.iter().sum::<f64>() / n as f64;

    // Low variance across a user's own purchases signals a consistent budget,
    // which we read as high price sensitivity. The ratio is capped at 1 so
    // high-variance histories bottom out at 0 instead of going negative.
    let price_sensitivity = if avg_price > 0.0 {
        let variance = prices
            .iter()
            .map(|p| (p - avg_price).powi(2))
            .sum::<f64>()
            / n as f64;
        1.0 - (variance.sqrt() / avg_price).min(1.0)
    } else {
        0.5
    };

    let mut brand_counts: HashMap<String, usize> = HashMap::new();
    for t in transactions {
        *brand_counts.entry(t.brand.clone()).or_insert(0) += 1;
    }
    let brand_loyalty = brand_counts
        .into_iter()
        .map(|(brand, count)| (brand, count as f64 / n as f64))
        .collect();

    HistoryProfile {
        price_sensitivity,
        avg_price,
        brand_loyalty,
        spec_preferences: spec_preferences(transactions, category),
        sample_size: n,
    }
}

/// Category-specific spec averages. Intentionally a narrow table, not a
/// generic aggregator: each supported category names the one spec that
/// historically predicts preference.
fn spec_preferences(transactions: &[Transaction], category: &str) -> HashMap<String, f64> {
    let mut prefs = HashMap::new();
    let tracked: &[(&str, &str)] = match category {
        "laptops" => &[("ram_gb", "avg_ram")],
        "smartphones" => &[("camera_mp", "avg_camera")],
        _ => &[],
    };
    for (spec_key, pref_key) in tracked {
        let values: Vec<f64> = transactions
            .iter()
            .filter_map(|t| t.specs.get(*spec_key).copied())
            .collect();
        if !values.is_empty() {
            prefs.insert(
                pref_key.to_string(),
                values.iter().sum::<f64>() / values.len() as f64,
            );
        }
    }
    prefs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(total_paid: f64, brand: &str, specs: &[(&str, f64)]) -> Transaction {
        Transaction {
            total_paid,
            brand: brand.to_string(),
            specs: specs.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    #[test]
    fn empty_history_yields_neutral_profile() {
        let p = profile(&[], "laptops");
        assert_eq!(p, HistoryProfile::neutral());
        assert_eq!(p.sample_size, 0);
        assert!((p.price_sensitivity - 0.5).abs() < 1e-12);
    }

    #[test]
    fn constant_spend_means_maximum_price_sensitivity() {
        let history = vec![tx(1000.0, "dell", &[]), tx(1000.0, "dell", &[])];
        let p = profile(&history, "laptops");
        assert!((p.price_sensitivity - 1.0).abs() < 1e-9);
        assert!((p.avg_price - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn variance_above_mean_caps_sensitivity_at_zero() {
        // stddev/mean > 1 for [10, 2000, 10]: the cap keeps the value at 0.
        let history = vec![tx(10.0, "a", &[]), tx(2000.0, "b", &[]), tx(10.0, "a", &[])];
        let p = profile(&history, "coffee");
        assert!((p.price_sensitivity - 0.0).abs() < 1e-9);
    }

    #[test]
    fn brand_loyalty_fractions_sum_to_one() {
        let history = vec![
            tx(500.0, "apple", &[]),
            tx(600.0, "apple", &[]),
            tx(700.0, "apple", &[]),
            tx(800.0, "dell", &[]),
        ];
        let p = profile(&history, "laptops");
        assert!((p.brand_loyalty["apple"] - 0.75).abs() < 1e-9);
        assert!((p.brand_loyalty["dell"] - 0.25).abs() < 1e-9);
        let total: f64 = p.brand_loyalty.values().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert_eq!(p.dominant_brand(), Some(("apple", 0.75)));
    }

    #[test]
    fn spec_preferences_track_ram_for_laptops_only() {
        let history = vec![
            tx(900.0, "dell", &[("ram_gb", 16.0)]),
            tx(1100.0, "dell", &[("ram_gb", 32.0)]),
            tx(1000.0, "dell", &[]), // no ram spec, excluded from the mean
        ];
        let p = profile(&history, "laptops");
        assert!((p.spec_preferences["avg_ram"] - 24.0).abs() < 1e-9);

        let p = profile(&history, "coffee");
        assert!(p.spec_preferences.is_empty());
    }

    #[test]
    fn smartphone_camera_average_uses_only_present_specs() {
        let history = vec![
            tx(700.0, "pixel", &[("camera_mp", 48.0)]),
            tx(800.0, "pixel", &[("camera_mp", 64.0)]),
        ];
        let p = profile(&history, "smartphones");
        assert!((p.spec_preferences["avg_camera"] - 56.0).abs() < 1e-9);
    }
}
