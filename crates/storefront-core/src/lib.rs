//! ============================================================================
//! STOREFRONT-CORE: NexusGear Marketplace Logic
//! ============================================================================
//! Everything under the storefront pages that is not view code:
//! - Static item catalog and the marketplace query engine
//! - Cart container with quantity bounds and checkout
//! - Session container with simulated async auth
//! - Local key-value persistence via redb
//! ============================================================================

pub mod cart;
pub mod catalog;
pub mod config;
pub mod db;
pub mod market;
pub mod pending;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use types::*;
pub use cart::{CartLine, CartStore, Checkout, CheckoutPayment, CheckoutSummary, OrderReceipt};
pub use catalog::Catalog;
pub use config::StorefrontConfig;
pub use db::{KeyValueStore, MemoryStore, StorefrontDb};
pub use market::{MarketQuery, QueryCriteria};
pub use pending::{OperationState, SimulatedLatency};
pub use session::{AuthBackend, DemoAuthBackend, Identity, SessionStore, SocialProvider, UserRole};
