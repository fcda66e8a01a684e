//! ============================================================================
//! Cart Module - Items a visitor intends to purchase
//! ============================================================================
//! Unique line per item id, quantities kept within 1..=99. Every mutation
//! rewrites the full cart under [`CART_KEY`]; a cart that cannot be read
//! back at startup is dropped and replaced by an empty one.
//! ============================================================================

mod checkout;
mod types;

pub use checkout::{
    Checkout, CheckoutPayment, CheckoutSummary, OrderReceipt, SHIPPING_COST, TAX_RATE,
};
pub use types::{clamp_quantity, CartLine, MAX_QUANTITY, MIN_QUANTITY};

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::db::{decode_json, store_json, KeyValueStore, CART_KEY};
use crate::types::MarketItem;

/// Cart container persisted to a local key-value store
pub struct CartStore {
    store: Arc<dyn KeyValueStore>,
    lines: Vec<CartLine>,
}

impl CartStore {
    /// Restore the persisted cart. Never fails: a value that does not
    /// decode is removed from the store and the cart starts empty. A failed
    /// read starts empty too but leaves the stored value alone.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let lines = match store.get_raw(CART_KEY) {
            Ok(Some(bytes)) => match decode_json::<Vec<CartLine>>(CART_KEY, &bytes) {
                Ok(lines) => normalize(lines),
                Err(e) => {
                    warn!("Discarding stored cart: {}", e);
                    if let Err(e) = store.remove(CART_KEY) {
                        warn!("Failed to clear stored cart: {}", e);
                    }
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read stored cart, starting empty: {}", e);
                Vec::new()
            }
        };

        debug!("Cart loaded with {} lines", lines.len());
        Self { store, lines }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Sum of price × quantity
    pub fn subtotal(&self) -> f64 {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Add `quantity` of `item`, merging into an existing line.
    /// The resulting quantity is clamped to 99; adding zero does nothing.
    pub fn add_item(&mut self, item: &MarketItem, quantity: u32) {
        if quantity == 0 {
            return;
        }

        let existing = self.lines.iter().position(|line| line.id == item.id);
        match existing {
            Some(idx) => {
                let line = &mut self.lines[idx];
                line.quantity = clamp_quantity(line.quantity.saturating_add(quantity));
                debug!("Cart: {} now x{}", line.id, line.quantity);
            }
            None => {
                let line = CartLine::from_item(item, quantity);
                debug!("Cart: added {} x{}", line.id, line.quantity);
                self.lines.push(line);
            }
        }

        info!("{} added to cart", item.name);
        self.persist();
    }

    /// Returns whether a line was removed; an absent id is a no-op
    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.id != id);
        let removed = self.lines.len() != before;

        if removed {
            info!("Removed {} from cart", id);
            self.persist();
        }
        removed
    }

    /// Below 1 removes the line, above 99 clamps, absent id is a no-op
    pub fn update_quantity(&mut self, id: &str, quantity: u32) {
        if quantity < MIN_QUANTITY {
            self.remove_item(id);
            return;
        }

        let Some(line) = self.lines.iter_mut().find(|line| line.id == id) else {
            return;
        };
        line.quantity = clamp_quantity(quantity);
        debug!("Cart: {} set to x{}", line.id, line.quantity);
        self.persist();
    }

    pub fn clear_cart(&mut self) {
        self.lines.clear();
        info!("Cart cleared");
        self.persist();
    }

    /// Full rewrite of the stored cart. A failed write leaves the in-memory
    /// cart as is.
    fn persist(&self) {
        if let Err(e) = store_json(self.store.as_ref(), CART_KEY, &self.lines) {
            warn!("Failed to persist cart: {}", e);
        }
    }
}

/// Enforce line invariants on data read back from the store
fn normalize(lines: Vec<CartLine>) -> Vec<CartLine> {
    let mut seen = HashSet::new();
    lines
        .into_iter()
        .filter(|line| line.quantity >= MIN_QUANTITY)
        .filter(|line| seen.insert(line.id.clone()))
        .map(|mut line| {
            line.quantity = clamp_quantity(line.quantity);
            line
        })
        .collect()
}
