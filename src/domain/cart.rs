use chrono::{DateTime, Utc};
use serde::Serialize;
use super::{ProductId, UserId};

/// A single cart line. `price` is the product price when the line was added.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: f64,
}

/// A customer's shopping cart, keyed by the owning user.
///
/// `total_items` and `total_price` are derived: every mutation goes through
/// [`Cart::recalculate`] and they are never set independently.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub user_id: UserId,
    pub items: Vec<CartItem>,
    pub total_items: u32,
    pub total_price: f64,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            items: Vec::new(),
            total_items: 0,
            total_price: 0.0,
            updated_at: Utc::now(),
        }
    }

    pub fn item(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }

    pub fn recalculate(&mut self) {
        self.total_items = self.items.iter().fold(0u32, |total, item| total.saturating_add(item.quantity));
        self.total_price = self.items.iter().map(|item| item.price * f64::from(item.quantity)).sum();
        self.updated_at = Utc::now();
    }
}
