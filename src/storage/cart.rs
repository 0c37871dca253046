//! Order manifest persistence.

use crate::model::Cart;

use super::{Result, Storage};

const CART: &str = "cart.json";

impl Storage {
    /// Loads the order manifest, empty when absent or unreadable.
    pub fn load_cart(&self) -> Result<Cart> {
        Ok(self.read_doc(CART)?.unwrap_or_default())
    }

    /// Writes the order manifest.
    pub fn save_cart(&self, cart: &Cart) -> Result<()> {
        self.write_doc(CART, cart)
    }
}
