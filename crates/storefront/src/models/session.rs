//! Session-related types.
//!
//! Types stored in the session: the logged-in identity and the cart.

use serde::{Deserialize, Serialize};

use spicejar_core::Username;

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// The account name.
    pub username: Username,
}

/// Session keys.
pub mod session_keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for storing the cart.
    pub const CART: &str = "cart";
}
