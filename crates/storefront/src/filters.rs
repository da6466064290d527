//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Formats a whole-rupee amount for display.
///
/// Usage in templates: `{{ product.price|rupees }}`
#[askama::filter_fn]
pub fn rupees(amount: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format!("₹{amount}"))
}
