//! Shopping cart state and business rules.
//!
//! The cart lives in the session as a map from product id to quantity.
//! Hard invariant on every mutation path: a key is present iff its
//! quantity is greater than zero. Entries whose product has left the
//! catalog are skipped when computing totals, not purged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use spicejar_core::{ProductId, Rupees};

use crate::catalog::Catalog;

/// Flat shipping fee charged on any non-empty order.
pub const SHIPPING_FEE: Rupees = Rupees::new(50);

/// Errors from cart mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The product id is not in the catalog.
    #[error("unknown product: {0}")]
    UnknownProduct(ProductId),

    /// A quantity change other than +1 or -1 was requested.
    #[error("invalid quantity change: {0}")]
    InvalidDelta(i32),
}

/// Per-session shopping cart.
///
/// A `BTreeMap` keeps line order stable for a given cart (ascending
/// product id), which is what the cart and checkout pages render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: BTreeMap<ProductId, u32>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Quantity for a product, zero if absent.
    #[must_use]
    pub fn quantity(&self, id: ProductId) -> u32 {
        self.lines.get(&id).copied().unwrap_or(0)
    }

    /// Total number of items across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.values().sum()
    }

    /// Add one of a product to the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::UnknownProduct` if the id is not in the
    /// catalog. The cart is unchanged on error.
    pub fn add(&mut self, catalog: &Catalog, id: ProductId) -> Result<(), CartError> {
        if catalog.lookup(id).is_none() {
            return Err(CartError::UnknownProduct(id));
        }
        *self.lines.entry(id).or_insert(0) += 1;
        Ok(())
    }

    /// Change a line's quantity by exactly +1 or -1.
    ///
    /// A product not currently in the cart is a no-op - the change is
    /// neither an error nor a way to create an entry. A line that
    /// reaches zero is removed.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidDelta` for any delta outside
    /// `{+1, -1}`. The cart is unchanged on error.
    pub fn change_quantity(&mut self, id: ProductId, delta: i32) -> Result<(), CartError> {
        if delta != 1 && delta != -1 {
            return Err(CartError::InvalidDelta(delta));
        }

        if let Some(quantity) = self.lines.get_mut(&id) {
            let updated = i64::from(*quantity) + i64::from(delta);
            if updated <= 0 {
                self.lines.remove(&id);
            } else {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                {
                    *quantity = updated as u32;
                }
            }
        }
        Ok(())
    }

    /// Drop a line entirely. Absent lines are a no-op; never fails.
    pub fn remove(&mut self, id: ProductId) {
        self.lines.remove(&id);
    }

    /// Compute line items and totals against the catalog.
    ///
    /// Pure: the cart is not mutated and repeated calls on the same
    /// cart and catalog yield identical results. Entries whose product
    /// no longer resolves are skipped - the catalog can change
    /// independently of live sessions.
    #[must_use]
    pub fn totals(&self, catalog: &Catalog) -> CartTotals {
        let mut items = Vec::with_capacity(self.lines.len());
        let mut subtotal = Rupees::ZERO;

        for (&id, &quantity) in &self.lines {
            let Some(product) = catalog.lookup(id) else {
                continue;
            };
            let line_total = product.price.times(quantity);
            subtotal += line_total;
            items.push(CartLine {
                id,
                name: product.name.clone(),
                image: product.image.clone(),
                quantity,
                unit_price: product.price,
                line_total,
            });
        }

        let shipping = if subtotal.is_zero() {
            Rupees::ZERO
        } else {
            SHIPPING_FEE
        };

        CartTotals {
            total: subtotal + shipping,
            items,
            subtotal,
            shipping,
        }
    }
}

/// A rendered cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: ProductId,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub unit_price: Rupees,
    pub line_total: Rupees,
}

/// Cart line items plus computed totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    pub items: Vec<CartLine>,
    pub subtotal: Rupees,
    pub shipping: Rupees,
    pub total: Rupees,
}

impl CartTotals {
    /// Whether there is anything to order.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Product};

    fn catalog() -> Catalog {
        Catalog::seed()
    }

    const MANGO: ProductId = ProductId::new(5);

    #[test]
    fn test_add_unknown_product_fails() {
        let mut cart = Cart::new();
        let err = cart.add(&catalog(), ProductId::new(99)).unwrap_err();
        assert_eq!(err, CartError::UnknownProduct(ProductId::new(99)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_increments_by_one() {
        let mut cart = Cart::new();
        cart.add(&catalog(), MANGO).unwrap();
        assert_eq!(cart.quantity(MANGO), 1);
        cart.add(&catalog(), MANGO).unwrap();
        assert_eq!(cart.quantity(MANGO), 2);
    }

    #[test]
    fn test_decrement_to_zero_removes_key() {
        let mut cart = Cart::new();
        cart.add(&catalog(), MANGO).unwrap();
        cart.add(&catalog(), MANGO).unwrap();

        cart.change_quantity(MANGO, -1).unwrap();
        assert_eq!(cart.quantity(MANGO), 1);
        cart.change_quantity(MANGO, -1).unwrap();
        assert_eq!(cart.quantity(MANGO), 0);
        assert!(cart.is_empty());

        // Idempotent at zero: one more decrement is a no-op.
        cart.change_quantity(MANGO, -1).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_change_quantity_absent_is_noop() {
        let mut cart = Cart::new();
        cart.change_quantity(MANGO, 1).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_change_quantity_rejects_bad_delta() {
        let mut cart = Cart::new();
        cart.add(&catalog(), MANGO).unwrap();
        let before = cart.clone();

        for delta in [0, 2, -2, 5, i32::MIN, i32::MAX] {
            let err = cart.change_quantity(MANGO, delta).unwrap_err();
            assert_eq!(err, CartError::InvalidDelta(delta));
            assert_eq!(cart, before);
        }
    }

    #[test]
    fn test_remove_is_unconditional() {
        let mut cart = Cart::new();
        cart.add(&catalog(), MANGO).unwrap();
        cart.remove(MANGO);
        assert!(cart.is_empty());
        // Removing again never fails.
        cart.remove(MANGO);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_totals_scenario() {
        // Catalog has product id=5 price=280.
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add(&catalog, MANGO).unwrap();
        cart.add(&catalog, MANGO).unwrap();

        let totals = cart.totals(&catalog);
        assert_eq!(totals.subtotal, Rupees::new(560));
        assert_eq!(totals.shipping, Rupees::new(50));
        assert_eq!(totals.total, Rupees::new(610));

        cart.change_quantity(MANGO, -1).unwrap();
        cart.change_quantity(MANGO, -1).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_totals_is_pure() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add(&catalog, MANGO).unwrap();
        cart.add(&catalog, ProductId::new(1)).unwrap();

        let first = cart.totals(&catalog);
        let second = cart.totals(&catalog);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_cart_has_no_shipping() {
        let totals = Cart::new().totals(&catalog());
        assert!(totals.is_empty());
        assert_eq!(totals.subtotal, Rupees::ZERO);
        assert_eq!(totals.shipping, Rupees::ZERO);
        assert_eq!(totals.total, Rupees::ZERO);
    }

    #[test]
    fn test_total_is_subtotal_plus_shipping() {
        let catalog = catalog();
        let mut cart = Cart::new();
        for id in [1, 5, 8, 12] {
            cart.add(&catalog, ProductId::new(id)).unwrap();
        }
        let totals = cart.totals(&catalog);
        assert_eq!(totals.total, totals.subtotal + totals.shipping);
    }

    #[test]
    fn test_stale_entries_are_skipped_not_purged() {
        let full = catalog();
        let mut cart = Cart::new();
        cart.add(&full, MANGO).unwrap();
        cart.add(&full, ProductId::new(1)).unwrap();

        // A catalog that has since dropped product 5.
        let shrunk = Catalog::new(vec![Product {
            id: ProductId::new(1),
            name: "Chicken Pickle".to_string(),
            price: Rupees::new(350),
            image: String::new(),
            description: String::new(),
        }]);

        let totals = cart.totals(&shrunk);
        assert_eq!(totals.items.len(), 1);
        assert_eq!(totals.subtotal, Rupees::new(350));
        // The stale line stays in the cart.
        assert_eq!(cart.quantity(MANGO), 1);
    }

    #[test]
    fn test_lines_render_in_id_order() {
        let catalog = catalog();
        let mut cart = Cart::new();
        for id in [12, 1, 5] {
            cart.add(&catalog, ProductId::new(id)).unwrap();
        }
        let ids: Vec<i32> = cart
            .totals(&catalog)
            .items
            .iter()
            .map(|line| line.id.as_i32())
            .collect();
        assert_eq!(ids, vec![1, 5, 12]);
    }

    #[test]
    fn test_session_serde_roundtrip() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add(&catalog, MANGO).unwrap();
        cart.add(&catalog, MANGO).unwrap();

        let json = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart);
    }
}
