//! ============================================================================
//! Core Types for the NexusGear Storefront
//! ============================================================================
//! Catalog records, filter vocabularies and the domain error type.
//! Everything here is serialized to JSON for the local store and the CLI.
//! ============================================================================

use serde::{Deserialize, Serialize};

/// Collapse a user-supplied label to a comparable slug ("Dota 2" -> "dota2")
fn slug(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Game a catalog item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameCategory {
    Limiteds,
    #[serde(rename = "CS2")]
    Cs2,
    #[serde(rename = "Dota 2")]
    Dota2,
    Rust,
    #[serde(rename = "In Game")]
    InGame,
}

impl GameCategory {
    pub const ALL: [GameCategory; 5] = [
        GameCategory::Limiteds,
        GameCategory::Cs2,
        GameCategory::Dota2,
        GameCategory::Rust,
        GameCategory::InGame,
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        match slug(s).as_str() {
            "limiteds" => Some(Self::Limiteds),
            "cs2" => Some(Self::Cs2),
            "dota2" => Some(Self::Dota2),
            "rust" => Some(Self::Rust),
            "ingame" => Some(Self::InGame),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Limiteds => "Limiteds",
            Self::Cs2 => "CS2",
            Self::Dota2 => "Dota 2",
            Self::Rust => "Rust",
            Self::InGame => "In Game",
        }
    }
}

/// Category criterion of the query engine: every category, or exactly one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(GameCategory),
}

impl CategoryFilter {
    pub fn from_str(s: &str) -> Option<Self> {
        if slug(s) == "all" {
            return Some(Self::All);
        }
        GameCategory::from_str(s).map(Self::Only)
    }

    pub fn matches(&self, category: GameCategory) -> bool {
        match self {
            Self::All => true,
            Self::Only(c) => *c == category,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Only(c) => c.as_str(),
        }
    }
}

/// Rarity tier for catalog items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemRarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl ItemRarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Uncommon => "uncommon",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
        }
    }
}

/// An item listed on the marketplace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketItem {
    pub id: String,
    pub name: String,
    pub image: String,
    pub category: GameCategory,
    /// Recent average price
    pub rap: f64,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<ItemRarity>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, rename = "new")]
    pub is_new: bool,
}

impl MarketItem {
    /// rap / price, unguarded: a zero price yields `inf` (or `NaN` for 0/0)
    pub fn rate(&self) -> f64 {
        self.rap / self.price
    }
}

/// Payment method criterion. Tracked by the query engine, never applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    All,
    Paypal,
    Card,
}

impl PaymentMethod {
    pub fn from_str(s: &str) -> Option<Self> {
        match slug(s).as_str() {
            "all" => Some(Self::All),
            "paypal" => Some(Self::Paypal),
            "card" | "creditcard" => Some(Self::Card),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Paypal => "Paypal",
            Self::Card => "Card",
        }
    }
}

/// The five fixed orderings of the marketplace view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    #[default]
    RapDesc,
    RapAsc,
    PriceDesc,
    PriceAsc,
    RateAsc,
}

impl SortOption {
    pub const ALL: [SortOption; 5] = [
        SortOption::RapDesc,
        SortOption::RapAsc,
        SortOption::PriceDesc,
        SortOption::PriceAsc,
        SortOption::RateAsc,
    ];

    /// Accepts either the kebab slug ("price-asc") or the display label
    pub fn from_str(s: &str) -> Option<Self> {
        let wanted = slug(s);
        Self::ALL
            .into_iter()
            .find(|opt| slug(opt.slug()) == wanted || slug(opt.label()) == wanted)
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Self::RapDesc => "rap-desc",
            Self::RapAsc => "rap-asc",
            Self::PriceDesc => "price-desc",
            Self::PriceAsc => "price-asc",
            Self::RateAsc => "rate-asc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::RapDesc => "Rap (High to Low)",
            Self::RapAsc => "Rap (Low to High)",
            Self::PriceDesc => "Price (High to Low)",
            Self::PriceAsc => "Price (Low to High)",
            Self::RateAsc => "Rate (Low to High)",
        }
    }
}

/// Error types for the storefront
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum StorefrontError {
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown sort option: {0}")]
    UnknownSortOption(String),

    #[error("Unknown payment method: {0}")]
    UnknownPaymentMethod(String),

    #[error("Unknown login provider: {0}")]
    UnknownProvider(String),

    #[error("Operation timed out after {0} ms")]
    Timeout(u64),
}
