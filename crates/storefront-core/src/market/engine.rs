//! ============================================================================
//! Market Query Engine - Criteria state plus the derived marketplace view
//! ============================================================================

use std::sync::Arc;
use tracing::{debug, warn};

use super::criteria::QueryCriteria;
use crate::catalog::{Catalog, RECENTLY_SOLD_COUNT};
use crate::types::{CategoryFilter, MarketItem, PaymentMethod, SortOption};

/// Holds the filter/sort criteria and the view derived from them.
/// The view is recomputed from scratch after every criteria change.
pub struct MarketQuery {
    catalog: Arc<Catalog>,
    min_price: f64,
    max_price: f64,
    criteria: QueryCriteria,
    filtered: Vec<MarketItem>,
    recently_sold: Vec<MarketItem>,
}

impl MarketQuery {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let (min_price, max_price) = catalog.price_bounds();
        let recently_sold = catalog.sample(RECENTLY_SOLD_COUNT);
        let mut query = Self {
            catalog,
            min_price,
            max_price,
            criteria: QueryCriteria::with_bounds(min_price, max_price),
            filtered: Vec::new(),
            recently_sold,
        };
        query.recompute();
        query
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn items(&self) -> &[MarketItem] {
        self.catalog.items()
    }

    pub fn criteria(&self) -> &QueryCriteria {
        &self.criteria
    }

    pub fn min_price(&self) -> f64 {
        self.min_price
    }

    pub fn max_price(&self) -> f64 {
        self.max_price
    }

    pub fn filtered_items(&self) -> &[MarketItem] {
        &self.filtered
    }

    /// Random sample taken once at construction
    pub fn recently_sold(&self) -> &[MarketItem] {
        &self.recently_sold
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.criteria.category = category;
        self.recompute();
    }

    /// Each bound is clamped into the catalog's observed price range.
    /// Swapped bounds are kept as given and produce an empty view.
    pub fn set_price_range(&mut self, min: f64, max: f64) {
        self.criteria.price_range = (self.clamp_price(min), self.clamp_price(max));
        self.recompute();
    }

    pub fn set_search_query(&mut self, text: impl Into<String>) {
        self.criteria.search = text.into();
        self.recompute();
    }

    /// Tracked only; never affects the view
    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.criteria.payment_method = method;
        self.recompute();
    }

    pub fn set_sort_option(&mut self, option: SortOption) {
        self.criteria.sort = option;
        self.recompute();
    }

    pub fn reset_filters(&mut self) {
        self.criteria = QueryCriteria::with_bounds(self.min_price, self.max_price);
        self.recompute();
    }

    fn clamp_price(&self, value: f64) -> f64 {
        value.clamp(self.min_price, self.max_price)
    }

    fn recompute(&mut self) {
        if self.criteria.sort == SortOption::RateAsc
            && self.catalog.items().iter().any(|item| item.price == 0.0)
        {
            warn!("Rate sort over zero-priced items: rap / 0 is unguarded");
        }
        self.filtered = self.criteria.apply(self.catalog.items());
        debug!(
            "Market view: {} of {} items ({:?})",
            self.filtered.len(),
            self.catalog.len(),
            self.criteria
        );
    }
}
