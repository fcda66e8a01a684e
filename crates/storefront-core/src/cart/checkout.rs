//! ============================================================================
//! Checkout - Order summary and simulated payment
//! ============================================================================
//! Digital goods: no shipping, flat sales tax. Payment is a fixed delay; a
//! placed order empties the cart.
//! ============================================================================

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::{CartLine, CartStore};
use crate::pending::{SimulatedLatency, DEFAULT_CHECKOUT_LATENCY_MS};
use crate::session::Identity;
use crate::types::StorefrontError;

/// Sales tax applied to the subtotal
pub const TAX_RATE: f64 = 0.08;

/// Digital items ship for free
pub const SHIPPING_COST: f64 = 0.0;

/// Payment methods offered at checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckoutPayment {
    #[default]
    CreditCard,
    Paypal,
    Crypto,
}

impl CheckoutPayment {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "credit-card" | "card" | "creditcard" => Some(Self::CreditCard),
            "paypal" => Some(Self::Paypal),
            "crypto" => Some(Self::Crypto),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreditCard => "credit-card",
            Self::Paypal => "paypal",
            Self::Crypto => "crypto",
        }
    }
}

/// Totals shown next to the checkout form
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSummary {
    pub item_count: u32,
    pub subtotal: f64,
    pub tax: f64,
    pub shipping: f64,
    pub total: f64,
}

impl CheckoutSummary {
    pub fn for_cart(cart: &CartStore) -> Self {
        let subtotal = cart.subtotal();
        let tax = subtotal * TAX_RATE;
        Self {
            item_count: cart.item_count(),
            subtotal,
            tax,
            shipping: SHIPPING_COST,
            total: subtotal + tax + SHIPPING_COST,
        }
    }
}

/// Confirmation of a placed order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub order_id: Uuid,
    /// Customer-facing number, e.g. "NG-4821"
    pub order_number: String,
    pub customer_id: String,
    pub customer_email: String,
    pub lines: Vec<CartLine>,
    pub summary: CheckoutSummary,
    pub payment: CheckoutPayment,
    pub placed_at: i64,
}

/// Places orders for the signed-in customer
#[derive(Debug, Clone)]
pub struct Checkout {
    latency: SimulatedLatency,
}

impl Default for Checkout {
    fn default() -> Self {
        Self::new(SimulatedLatency::from_millis(DEFAULT_CHECKOUT_LATENCY_MS))
    }
}

impl Checkout {
    pub fn new(latency: SimulatedLatency) -> Self {
        Self { latency }
    }

    /// Requires an identity and a non-empty cart. On success the cart is
    /// cleared and the receipt returned.
    pub async fn place_order(
        &self,
        cart: &mut CartStore,
        customer: Option<&Identity>,
        payment: CheckoutPayment,
    ) -> Result<OrderReceipt, StorefrontError> {
        let customer = customer.ok_or(StorefrontError::NotAuthenticated)?;
        if cart.is_empty() {
            return Err(StorefrontError::EmptyCart);
        }

        let summary = CheckoutSummary::for_cart(cart);
        let lines = cart.lines().to_vec();

        self.latency.wait().await;

        let receipt = OrderReceipt {
            order_id: Uuid::new_v4(),
            order_number: format!("NG-{}", rand::thread_rng().gen_range(0..10_000)),
            customer_id: customer.id.clone(),
            customer_email: customer.email.clone(),
            lines,
            summary,
            payment,
            placed_at: chrono::Utc::now().timestamp(),
        };

        cart.clear_cart();
        info!(
            "Order {} placed by {}: {} items, {:.2} total via {}",
            receipt.order_number,
            customer.username,
            summary.item_count,
            summary.total,
            payment.as_str()
        );
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::session::UserRole;
    use crate::types::{GameCategory, MarketItem};
    use std::sync::Arc;

    fn item(id: &str, price: f64) -> MarketItem {
        MarketItem {
            id: id.to_string(),
            name: id.to_string(),
            image: String::new(),
            category: GameCategory::Dota2,
            rap: price,
            price,
            rarity: None,
            featured: false,
            is_new: false,
        }
    }

    fn customer() -> Identity {
        Identity::new(
            "user-1".into(),
            "DemoUser".into(),
            "demo@example.com".into(),
            UserRole::User,
        )
    }

    fn cart_with_items() -> CartStore {
        let mut cart = CartStore::load(Arc::new(MemoryStore::new()));
        cart.add_item(&item("a", 50.0), 2);
        cart.add_item(&item("b", 25.0), 2);
        cart
    }

    #[test]
    fn test_summary_adds_tax() {
        let summary = CheckoutSummary::for_cart(&cart_with_items());
        assert_eq!(summary.item_count, 4);
        assert_eq!(summary.subtotal, 150.0);
        assert!((summary.tax - 12.0).abs() < 1e-9);
        assert_eq!(summary.shipping, 0.0);
        assert!((summary.total - 162.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_place_order_clears_cart() {
        let mut cart = cart_with_items();
        let checkout = Checkout::new(SimulatedLatency::instant());
        let receipt = checkout
            .place_order(&mut cart, Some(&customer()), CheckoutPayment::Paypal)
            .await
            .unwrap();

        assert!(receipt.order_number.starts_with("NG-"));
        assert_eq!(receipt.lines.len(), 2);
        assert_eq!(receipt.summary.item_count, 4);
        assert_eq!(receipt.customer_email, "demo@example.com");
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_place_order_requires_identity() {
        let mut cart = cart_with_items();
        let checkout = Checkout::new(SimulatedLatency::instant());
        let err = checkout
            .place_order(&mut cart, None, CheckoutPayment::CreditCard)
            .await
            .unwrap_err();
        assert_eq!(err, StorefrontError::NotAuthenticated);
        assert_eq!(cart.item_count(), 4);
    }

    #[tokio::test]
    async fn test_place_order_rejects_empty_cart() {
        let mut cart = CartStore::load(Arc::new(MemoryStore::new()));
        let checkout = Checkout::new(SimulatedLatency::instant());
        let err = checkout
            .place_order(&mut cart, Some(&customer()), CheckoutPayment::Crypto)
            .await
            .unwrap_err();
        assert_eq!(err, StorefrontError::EmptyCart);
    }

    #[test]
    fn test_payment_parsing() {
        assert_eq!(CheckoutPayment::from_str("card"), Some(CheckoutPayment::CreditCard));
        assert_eq!(CheckoutPayment::from_str("PayPal"), Some(CheckoutPayment::Paypal));
        assert_eq!(CheckoutPayment::from_str("cash"), None);
    }
}
