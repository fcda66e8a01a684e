//! ============================================================================
//! Market Module - Marketplace query engine
//! ============================================================================
//! Category, price range, name search and sort over the static catalog.
//!
//! ## Usage
//! ```rust,ignore
//! use storefront_core::market::MarketQuery;
//!
//! let mut market = MarketQuery::new(Arc::new(Catalog::builtin()?));
//! market.set_category(CategoryFilter::Only(GameCategory::Cs2));
//! market.set_sort_option(SortOption::PriceAsc);
//! for item in market.filtered_items() { /* render */ }
//! ```
//! ============================================================================

mod criteria;
mod engine;

pub use criteria::{sort_items, QueryCriteria};
pub use engine::MarketQuery;
