//! Fixed criteria sets per product category.
//!
//! The criteria list for a category never changes at runtime — only weights
//! do. Unknown categories deliberately fall back to a small default set
//! rather than erroring, so an unrecognized query still produces a ranking.

use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Ordered criteria for one category plus the subset that are cost criteria
/// (lower raw value = better; their scores are inverted after normalization).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriteriaSet {
    pub criteria: Vec<String>,
    pub cost_criteria: BTreeSet<String>,
}

impl CriteriaSet {
    pub fn new(criteria: &[&str], cost_criteria: &[&str]) -> Self {
        let set = Self {
            criteria: criteria.iter().map(|c| c.to_string()).collect(),
            cost_criteria: cost_criteria.iter().map(|c| c.to_string()).collect(),
        };
        debug_assert!(
            set.cost_criteria.iter().all(|c| set.criteria.contains(c)),
            "cost criteria must be a subset of criteria"
        );
        set
    }

    pub fn is_cost(&self, criterion: &str) -> bool {
        self.cost_criteria.contains(criterion)
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }
}

/// Immutable category → criteria lookup, built once and injected by
/// reference into the deriver and scorer.
#[derive(Debug, Clone)]
pub struct CriteriaRegistry {
    by_category: HashMap<String, CriteriaSet>,
    default_set: CriteriaSet,
}

static BUILTIN: Lazy<CriteriaRegistry> = Lazy::new(|| {
    let mut by_category = HashMap::new();
    by_category.insert(
        "laptops".to_string(),
        CriteriaSet::new(
            &[
                "price",
                "performance",
                "battery_life",
                "portability",
                "display_quality",
                "brand_reputation",
            ],
            &["price"],
        ),
    );
    by_category.insert(
        "smartphones".to_string(),
        CriteriaSet::new(
            &[
                "price",
                "camera_quality",
                "battery_life",
                "performance",
                "storage_capacity",
                "brand_ecosystem",
            ],
            &["price"],
        ),
    );
    by_category.insert(
        "coffee".to_string(),
        CriteriaSet::new(
            &[
                "price",
                "roast_quality",
                "origin_prestige",
                "organic_certification",
                "flavor_complexity",
            ],
            &["price"],
        ),
    );
    by_category.insert(
        "sneakers".to_string(),
        CriteriaSet::new(
            &["price", "comfort", "style", "durability", "brand_prestige"],
            &["price"],
        ),
    );

    CriteriaRegistry {
        by_category,
        default_set: CriteriaSet::new(&["price", "quality", "brand"], &["price"]),
    }
});

impl CriteriaRegistry {
    /// The process-wide builtin registry.
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Registry with custom category tables. `default_set` serves every
    /// category not present in the map.
    pub fn with_categories(
        by_category: HashMap<String, CriteriaSet>,
        default_set: CriteriaSet,
    ) -> Self {
        Self {
            by_category,
            default_set,
        }
    }

    /// Exact-key lookup; unknown categories get the default set. Never fails.
    pub fn get(&self, category: &str) -> &CriteriaSet {
        self.by_category.get(category).unwrap_or(&self.default_set)
    }

    pub fn default_set(&self) -> &CriteriaSet {
        &self.default_set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_category_returns_its_table() {
        let set = CriteriaRegistry::builtin().get("laptops");
        assert_eq!(set.criteria.len(), 6);
        assert_eq!(set.criteria[0], "price");
        assert!(set.is_cost("price"));
        assert!(!set.is_cost("performance"));
    }

    #[test]
    fn unknown_category_falls_back_to_default_set() {
        let registry = CriteriaRegistry::builtin();
        let set = registry.get("submarines");
        assert_eq!(
            set.criteria,
            vec!["price".to_string(), "quality".to_string(), "brand".to_string()]
        );
        assert!(set.is_cost("price"));
        assert_eq!(set, registry.default_set());
        // Fuzzy keys do not match.
        assert_eq!(registry.get("Laptops"), registry.default_set());
    }

    #[test]
    fn every_builtin_category_lists_price_as_cost() {
        let registry = CriteriaRegistry::builtin();
        for category in ["laptops", "smartphones", "coffee", "sneakers"] {
            let set = registry.get(category);
            assert!(set.is_cost("price"), "{category} must invert price");
            assert!(set
                .cost_criteria
                .iter()
                .all(|c| set.criteria.contains(c)));
        }
    }
}
