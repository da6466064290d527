//! Order snapshot types.
//!
//! An order is an ephemeral snapshot of the cart at placement time.
//! Once written to the record store it is never read back by the
//! storefront - there is no per-user order history surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use spicejar_core::Rupees;

use crate::models::cart::CartLine;

/// Contact details collected on the checkout page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutDetails {
    pub name: String,
    pub address: String,
    pub email: String,
    pub phone: String,
}

/// A placed order, derived from cart + catalog at checkout time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSnapshot {
    /// Write-once order id.
    pub order_id: Uuid,
    /// When the order was placed.
    pub placed_at: DateTime<Utc>,
    /// Account that placed the order.
    pub username: String,
    /// Contact details from the checkout form.
    pub customer: CheckoutDetails,
    /// Line items in cart order.
    pub lines: Vec<CartLine>,
    pub subtotal: Rupees,
    pub shipping: Rupees,
    pub total: Rupees,
}

impl OrderSnapshot {
    /// Plain-text summary used as the confirmation email body.
    #[must_use]
    pub fn summary(&self) -> String {
        use std::fmt::Write;

        let mut body = format!("Order {} placed by {}\n\n", self.order_id, self.username);
        for line in &self.lines {
            let _ = writeln!(
                body,
                "{} x{} - Rs.{}",
                line.name, line.quantity, line.line_total
            );
        }
        let _ = write!(
            body,
            "\nSubtotal: Rs.{}\nShipping: Rs.{}\nTotal: Rs.{}\n\nShipping to: {}, {}",
            self.subtotal, self.shipping, self.total, self.customer.name, self.customer.address
        );
        body
    }
}
