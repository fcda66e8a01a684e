//! ============================================================================
//! Item Catalog - The static, ordered marketplace dataset
//! ============================================================================
//! Loaded once at startup, either from the dataset bundled with the crate or
//! from a JSON file, and never mutated afterwards.
//! ============================================================================

use anyhow::{anyhow, Result};
use rand::seq::SliceRandom;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::types::MarketItem;

/// Dataset shipped with the crate
const BUILTIN_ITEMS: &str = include_str!("../data/market-items.json");

/// Maximum number of related items shown next to an item
pub const RELATED_LIMIT: usize = 4;

/// Number of items sampled for the "recently sold" strip
pub const RECENTLY_SOLD_COUNT: usize = 6;

/// Immutable ordered sequence of catalog items
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<MarketItem>,
}

impl Catalog {
    /// Build a catalog, keeping the first record of any duplicated id.
    /// Items whose price is NaN or infinite are dropped.
    pub fn new(items: Vec<MarketItem>) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(items.len());
        for item in items {
            if !item.price.is_finite() {
                warn!("Dropping catalog item {} with invalid price {}", item.id, item.price);
            } else if seen.insert(item.id.clone()) {
                kept.push(item);
            } else {
                warn!("Dropping duplicate catalog item: {}", item.id);
            }
        }
        Self { items: kept }
    }

    /// The dataset bundled with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_ITEMS)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let items: Vec<MarketItem> = serde_json::from_str(json)
            .map_err(|e| anyhow!("Failed to parse catalog: {}", e))?;
        Ok(Self::new(items))
    }

    /// Load a catalog from a JSON file (an array of item records)
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read catalog {}: {}", path.display(), e))?;
        let catalog = Self::from_json(&json)?;
        info!("Loaded {} catalog items from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn items(&self) -> &[MarketItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&MarketItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Observed (min, max) price. An empty catalog reports (0, 0).
    pub fn price_bounds(&self) -> (f64, f64) {
        let mut prices = self.items.iter().map(|item| item.price);
        let Some(first) = prices.next() else {
            return (0.0, 0.0);
        };
        prices.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)))
    }

    /// Items sharing the category of `id`, excluding `id`, in catalog order
    pub fn related(&self, id: &str, limit: usize) -> Vec<&MarketItem> {
        let Some(item) = self.get(id) else {
            return Vec::new();
        };
        self.items
            .iter()
            .filter(|other| other.category == item.category && other.id != item.id)
            .take(limit)
            .collect()
    }

    /// Up to `count` distinct items in random order
    pub fn sample(&self, count: usize) -> Vec<MarketItem> {
        let mut rng = rand::thread_rng();
        let picked: Vec<MarketItem> = self
            .items
            .choose_multiple(&mut rng, count)
            .cloned()
            .collect();
        debug!("Sampled {} of {} catalog items", picked.len(), self.items.len());
        picked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GameCategory;

    fn item(id: &str, category: GameCategory, price: f64) -> MarketItem {
        MarketItem {
            id: id.to_string(),
            name: id.to_uppercase(),
            image: String::new(),
            category,
            rap: price,
            price,
            rarity: None,
            featured: false,
            is_new: false,
        }
    }

    #[test]
    fn test_builtin_catalog_parses() {
        let catalog = Catalog::builtin().unwrap();
        assert!(!catalog.is_empty());
        assert!(catalog.get("awp-asiimov").is_some());
        assert!(catalog.items().iter().all(|i| i.price >= 0.0 && i.rap >= 0.0));
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let catalog = Catalog::new(vec![
            item("a", GameCategory::Rust, 1.0),
            item("a", GameCategory::Cs2, 2.0),
            item("b", GameCategory::Rust, 3.0),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("a").unwrap().category, GameCategory::Rust);
    }

    #[test]
    fn test_non_finite_prices_are_dropped() {
        let catalog = Catalog::new(vec![
            item("nan", GameCategory::Rust, f64::NAN),
            item("inf", GameCategory::Rust, f64::INFINITY),
            item("ok", GameCategory::Rust, 5.0),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.price_bounds(), (5.0, 5.0));

        let all_nan = Catalog::new(vec![item("nan", GameCategory::Cs2, f64::NAN)]);
        assert!(all_nan.is_empty());
        assert_eq!(all_nan.price_bounds(), (0.0, 0.0));
    }

    #[test]
    fn test_price_bounds() {
        let catalog = Catalog::new(vec![
            item("a", GameCategory::Rust, 50.0),
            item("b", GameCategory::Rust, 10.0),
            item("c", GameCategory::Rust, 90.0),
        ]);
        assert_eq!(catalog.price_bounds(), (10.0, 90.0));
        assert_eq!(Catalog::default().price_bounds(), (0.0, 0.0));
    }

    #[test]
    fn test_related_items() {
        let catalog = Catalog::new(vec![
            item("a", GameCategory::Rust, 1.0),
            item("b", GameCategory::Cs2, 1.0),
            item("c", GameCategory::Rust, 1.0),
            item("d", GameCategory::Rust, 1.0),
            item("e", GameCategory::Rust, 1.0),
            item("f", GameCategory::Rust, 1.0),
            item("g", GameCategory::Rust, 1.0),
        ]);
        let related = catalog.related("a", RELATED_LIMIT);
        let ids: Vec<&str> = related.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "d", "e", "f"]);
        assert!(catalog.related("missing", RELATED_LIMIT).is_empty());
    }

    #[test]
    fn test_sample_is_distinct_subset() {
        let catalog = Catalog::builtin().unwrap();
        let picked = catalog.sample(RECENTLY_SOLD_COUNT);
        assert_eq!(picked.len(), RECENTLY_SOLD_COUNT.min(catalog.len()));

        let ids: HashSet<&str> = picked.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids.len(), picked.len());
        assert!(picked.iter().all(|i| catalog.get(&i.id).is_some()));

        let tiny = Catalog::new(vec![item("solo", GameCategory::Rust, 1.0)]);
        assert_eq!(tiny.sample(RECENTLY_SOLD_COUNT).len(), 1);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(Catalog::from_json("{not json").is_err());
    }
}
