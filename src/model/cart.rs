//! The order manifest and its line operations.

use serde::{Deserialize, Serialize};

/// One line in the manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,
    pub name: String,
    pub unit_price: f64,
    pub quantity: u32,
    pub category: String,
}

/// The order manifest. Lines keep insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Adds an item, bumping quantity by one when the id already has a line.
    pub fn add(&mut self, item: CartItem) {
        if let Some(line) = self.items.iter_mut().find(|l| l.id == item.id) {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            self.items.push(CartItem {
                quantity: 1,
                ..item
            });
        }
    }

    /// Adjusts a line's quantity, clamped to at least one.
    /// Unknown ids are ignored.
    pub fn bump(&mut self, id: &str, delta: i32) {
        if let Some(line) = self.items.iter_mut().find(|l| l.id == id) {
            let step = delta.unsigned_abs();
            line.quantity = if delta < 0 {
                line.quantity.saturating_sub(step).max(1)
            } else {
                line.quantity.saturating_add(step)
            };
        }
    }

    /// Removes a line unconditionally.
    pub fn remove(&mut self, id: &str) {
        self.items.retain(|l| l.id != id);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all lines.
    pub fn units(&self) -> u32 {
        self.items.iter().map(|l| l.quantity).sum()
    }

    pub fn subtotal(&self) -> f64 {
        self.items
            .iter()
            .map(|l| l.unit_price * f64::from(l.quantity))
            .sum()
    }
}
