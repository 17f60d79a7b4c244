//! Hard constraint filtering applied before any scoring.
//!
//! Constraints are conjunctive and exact: budget bounds on price and a
//! case-insensitive exact brand match. No fuzzy matching. An empty result is
//! a valid terminal state — the pipeline short-circuits instead of erroring.

use crate::model::{Alternative, QueryConstraints};

/// Keep alternatives satisfying every constraint present, preserving input
/// order.
pub fn filter(alternatives: &[Alternative], constraints: &QueryConstraints) -> Vec<Alternative> {
    alternatives
        .iter()
        .filter(|alt| satisfies(alt, constraints))
        .cloned()
        .collect()
}

fn satisfies(alt: &Alternative, constraints: &QueryConstraints) -> bool {
    if let Some(max) = constraints.budget_max {
        if alt.price > max {
            return false;
        }
    }
    if let Some(min) = constraints.budget_min {
        if alt.price < min {
            return false;
        }
    }
    if let Some(brand) = &constraints.brand_preference {
        if !alt.brand.eq_ignore_ascii_case(brand) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alt(id: &str, brand: &str, price: f64) -> Alternative {
        Alternative {
            id: id.to_string(),
            name: id.to_string(),
            category: "laptops".to_string(),
            brand: brand.to_string(),
            price,
            specs: Default::default(),
        }
    }

    #[test]
    fn budget_bounds_apply_conjunctively() {
        let alts = vec![
            alt("a", "dell", 400.0),
            alt("b", "dell", 900.0),
            alt("c", "dell", 1600.0),
        ];
        let mut constraints = QueryConstraints::for_category("laptops");
        constraints.budget_min = Some(500.0);
        constraints.budget_max = Some(1500.0);

        let kept = filter(&alts, &constraints);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "b");
    }

    #[test]
    fn bounds_are_inclusive() {
        let alts = vec![alt("a", "dell", 500.0), alt("b", "dell", 1500.0)];
        let mut constraints = QueryConstraints::for_category("laptops");
        constraints.budget_min = Some(500.0);
        constraints.budget_max = Some(1500.0);
        assert_eq!(filter(&alts, &constraints).len(), 2);
    }

    #[test]
    fn brand_match_is_case_insensitive_and_exact() {
        let alts = vec![
            alt("a", "Apple", 1000.0),
            alt("b", "apple", 1200.0),
            alt("c", "applesauce", 800.0),
        ];
        let mut constraints = QueryConstraints::for_category("laptops");
        constraints.brand_preference = Some("APPLE".to_string());

        let kept = filter(&alts, &constraints);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].id, "a");
        assert_eq!(kept[1].id, "b");
    }

    #[test]
    fn no_constraints_keeps_everything_in_order() {
        let alts = vec![alt("z", "x", 1.0), alt("y", "x", 2.0), alt("a", "x", 3.0)];
        let kept = filter(&alts, &QueryConstraints::default());
        let ids: Vec<&str> = kept.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "y", "a"]);
    }

    #[test]
    fn filtering_everything_out_is_not_an_error() {
        let alts = vec![alt("a", "dell", 2000.0)];
        let mut constraints = QueryConstraints::for_category("laptops");
        constraints.budget_max = Some(100.0);
        assert!(filter(&alts, &constraints).is_empty());
    }
}
