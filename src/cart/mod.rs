//! Cart
//!
//! In-memory register state for the POS terminal. Each catalog item gets at
//! most one line; quantities are capped by the stock recorded on the
//! snapshot at add time. The engine never re-checks live backend stock —
//! checkout is where the backend has the final word.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::api::medicines::Medicine;

/// Errors signalled by cart mutations. Rejections leave the cart unchanged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// Adding another unit would exceed the snapshot's stock.
    #[error("only {available} units of {name} available")]
    StockLimit {
        /// Item name, for the operator message.
        name: String,
        /// Stock recorded on the snapshot.
        available: u32,
    },

    /// The item has no stock at all.
    #[error("{name} is out of stock")]
    OutOfStock {
        /// Item name, for the operator message.
        name: String,
    },
}

/// One catalog item plus its pending quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    item: Medicine,
    quantity: u32,
}

impl CartLine {
    /// The catalog snapshot behind this line.
    #[must_use]
    pub fn item(&self) -> &Medicine {
        &self.item
    }

    /// Units pending checkout. Always at least 1.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// `unit price * quantity` for this line.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.item.price * Decimal::from(self.quantity)
    }
}

/// The register's pending sale.
#[derive(Debug, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of `item`.
    ///
    /// An existing line is incremented; a new line starts at quantity 1.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::StockLimit`] when the increment would exceed
    /// the snapshot's stock, or [`CartError::OutOfStock`] when a new item
    /// has no stock. The cart is unchanged on error.
    pub fn add(&mut self, item: &Medicine) -> Result<(), CartError> {
        if let Some(line) = self.lines.iter_mut().find(|line| line.item.id == item.id) {
            if line.quantity >= item.stock_quantity {
                return Err(CartError::StockLimit {
                    name: item.name.clone(),
                    available: item.stock_quantity,
                });
            }

            line.quantity += 1;

            return Ok(());
        }

        if item.stock_quantity < 1 {
            return Err(CartError::OutOfStock {
                name: item.name.clone(),
            });
        }

        self.lines.push(CartLine {
            item: item.clone(),
            quantity: 1,
        });

        Ok(())
    }

    /// Remove one unit of the item with the given id; the line disappears
    /// when its quantity reaches zero. No-op when the item is not carted.
    pub fn remove(&mut self, item_id: i64) {
        let Some(index) = self.lines.iter().position(|line| line.item.id == item_id) else {
            return;
        };

        if let Some(line) = self.lines.get_mut(index) {
            if line.quantity > 1 {
                line.quantity -= 1;
            } else {
                self.lines.remove(index);
            }
        }
    }

    /// Grand total across all lines. Recomputed on every read.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Iterate over the lines in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
