//! ============================================================================
//! Query Criteria - Filter and sort pipeline over catalog items
//! ============================================================================
//! category -> price range (inclusive) -> name search -> stable sort.
//! Filters compose with AND. The payment method rides along untouched.
//! ============================================================================

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::types::{CategoryFilter, MarketItem, PaymentMethod, SortOption};

/// Current filter/sort state of the marketplace view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryCriteria {
    pub category: CategoryFilter,
    /// Inclusive (min, max). Not reordered when min > max.
    pub price_range: (f64, f64),
    pub search: String,
    pub payment_method: PaymentMethod,
    pub sort: SortOption,
}

impl QueryCriteria {
    /// Default criteria spanning the given price bounds
    pub fn with_bounds(min_price: f64, max_price: f64) -> Self {
        Self {
            category: CategoryFilter::All,
            price_range: (min_price, max_price),
            search: String::new(),
            payment_method: PaymentMethod::All,
            sort: SortOption::RapDesc,
        }
    }

    pub fn matches(&self, item: &MarketItem) -> bool {
        let (min, max) = self.price_range;
        self.category.matches(item.category)
            && item.price >= min
            && item.price <= max
            && matches_search(&item.name, &self.search)
    }

    /// Derive the filtered, sorted view of `items`
    pub fn apply(&self, items: &[MarketItem]) -> Vec<MarketItem> {
        let mut result: Vec<MarketItem> = items
            .iter()
            .filter(|item| self.matches(item))
            .cloned()
            .collect();
        sort_items(&mut result, self.sort);
        result
    }
}

/// Case-insensitive substring match on the display name
fn matches_search(name: &str, query: &str) -> bool {
    query.is_empty() || name.to_lowercase().contains(&query.to_lowercase())
}

/// NaN rates (0 / 0) sort after every number, including +inf
fn cmp_rate(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.total_cmp(&b),
    }
}

/// Stable in-place sort by the chosen option
pub fn sort_items(items: &mut [MarketItem], option: SortOption) {
    match option {
        SortOption::RapDesc => items.sort_by(|a, b| b.rap.total_cmp(&a.rap)),
        SortOption::RapAsc => items.sort_by(|a, b| a.rap.total_cmp(&b.rap)),
        SortOption::PriceDesc => items.sort_by(|a, b| b.price.total_cmp(&a.price)),
        SortOption::PriceAsc => items.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortOption::RateAsc => items.sort_by(|a, b| cmp_rate(a.rate(), b.rate())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GameCategory;

    fn item(id: &str, name: &str, category: GameCategory, rap: f64, price: f64) -> MarketItem {
        MarketItem {
            id: id.to_string(),
            name: name.to_string(),
            image: String::new(),
            category,
            rap,
            price,
            rarity: None,
            featured: false,
            is_new: false,
        }
    }

    fn sample() -> Vec<MarketItem> {
        vec![
            item("a", "Crimson Blade", GameCategory::Cs2, 30.0, 20.0),
            item("b", "Frost Helm", GameCategory::Limiteds, 500.0, 400.0),
            item("c", "crimson Mask", GameCategory::Rust, 12.0, 15.0),
            item("d", "Golden Hook", GameCategory::Dota2, 90.0, 60.0),
        ]
    }

    fn ids(items: &[MarketItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_default_criteria_keeps_everything_sorted_by_rap() {
        let criteria = QueryCriteria::with_bounds(15.0, 400.0);
        let view = criteria.apply(&sample());
        assert_eq!(ids(&view), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_filters_compose_with_and() {
        let mut criteria = QueryCriteria::with_bounds(15.0, 400.0);
        criteria.search = "CRIMSON".into();
        assert_eq!(ids(&criteria.apply(&sample())), vec!["a", "c"]);

        criteria.category = CategoryFilter::Only(GameCategory::Rust);
        assert_eq!(ids(&criteria.apply(&sample())), vec!["c"]);

        criteria.price_range = (16.0, 400.0);
        assert!(criteria.apply(&sample()).is_empty());
    }

    #[test]
    fn test_price_range_is_inclusive() {
        let mut criteria = QueryCriteria::with_bounds(20.0, 60.0);
        criteria.sort = SortOption::PriceAsc;
        assert_eq!(ids(&criteria.apply(&sample())), vec!["a", "d"]);
    }

    #[test]
    fn test_swapped_bounds_yield_empty_view() {
        let criteria = QueryCriteria::with_bounds(400.0, 15.0);
        assert!(criteria.apply(&sample()).is_empty());
    }

    #[test]
    fn test_search_ignores_category_and_rarity() {
        let mut criteria = QueryCriteria::with_bounds(0.0, 1000.0);
        criteria.search = "rust".into();
        assert!(criteria.apply(&sample()).is_empty());
    }

    #[test]
    fn test_every_sort_option() {
        let mut criteria = QueryCriteria::with_bounds(0.0, 1000.0);
        let expected = [
            (SortOption::RapDesc, vec!["b", "d", "a", "c"]),
            (SortOption::RapAsc, vec!["c", "a", "d", "b"]),
            (SortOption::PriceDesc, vec!["b", "d", "a", "c"]),
            (SortOption::PriceAsc, vec!["c", "a", "d", "b"]),
            // rates: a 1.5, b 1.25, c 0.8, d 1.5
            (SortOption::RateAsc, vec!["c", "b", "a", "d"]),
        ];
        for (option, want) in expected {
            criteria.sort = option;
            assert_eq!(ids(&criteria.apply(&sample())), want, "sort {:?}", option);
        }
    }

    #[test]
    fn test_payment_method_never_changes_the_view() {
        let mut criteria = QueryCriteria::with_bounds(0.0, 1000.0);
        let baseline = criteria.apply(&sample());
        for method in [PaymentMethod::Paypal, PaymentMethod::Card, PaymentMethod::All] {
            criteria.payment_method = method;
            assert_eq!(criteria.apply(&sample()), baseline);
        }
    }

    #[test]
    fn test_rate_sort_with_zero_prices() {
        let items = vec![
            item("free", "Free", GameCategory::InGame, 5.0, 0.0),
            item("zero", "Zero", GameCategory::InGame, 0.0, 0.0),
            item("paid", "Paid", GameCategory::InGame, 5.0, 10.0),
        ];
        let mut criteria = QueryCriteria::with_bounds(0.0, 10.0);
        criteria.sort = SortOption::RateAsc;
        assert_eq!(ids(&criteria.apply(&items)), vec!["paid", "free", "zero"]);
    }
}
