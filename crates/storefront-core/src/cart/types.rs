//! ============================================================================
//! Cart Types - Line items held by the cart container
//! ============================================================================

use serde::{Deserialize, Serialize};

use crate::types::{GameCategory, ItemRarity, MarketItem};

/// Smallest quantity a line may hold; anything lower removes the line
pub const MIN_QUANTITY: u32 = 1;

/// Largest quantity a line may hold; anything higher is clamped
pub const MAX_QUANTITY: u32 = 99;

/// One cart entry. Carries a copy of the item's display fields so it still
/// renders if the catalog entry disappears.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: String,
    pub name: String,
    pub image: String,
    pub category: GameCategory,
    pub rap: f64,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<ItemRarity>,
    pub quantity: u32,
}

impl CartLine {
    pub fn from_item(item: &MarketItem, quantity: u32) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            image: item.image.clone(),
            category: item.category,
            rap: item.rap,
            price: item.price,
            rarity: item.rarity,
            quantity: clamp_quantity(quantity),
        }
    }

    pub fn line_total(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

/// Clamp into `MIN_QUANTITY..=MAX_QUANTITY`
pub fn clamp_quantity(quantity: u32) -> u32 {
    quantity.clamp(MIN_QUANTITY, MAX_QUANTITY)
}
