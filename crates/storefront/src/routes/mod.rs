//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Product listing (login required)
//! GET  /health                 - Health check
//! GET  /about                  - About page
//!
//! # Cart
//! GET  /cart                   - Cart page with totals
//! POST /cart/add               - Add one of a product  → redirect /
//! POST /cart/update            - ±1 quantity           → redirect /cart
//! POST /cart/remove            - Drop a line           → redirect /cart
//!
//! # Checkout
//! GET  /checkout               - Order review
//! POST /checkout/place         - Place order           → redirect /checkout/success
//! GET  /checkout/success       - Confirmation page
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action
//! GET  /auth/register          - Register page
//! POST /auth/register          - Register action
//! POST /auth/logout            - Logout action (flushes the session)
//!
//! # Reviews & Contact
//! GET  /reviews                - Review list (guests welcome)
//! POST /reviews                - Submit a review
//! GET  /contact                - Contact form and past messages
//! POST /contact                - Submit a contact message
//! ```
//!
//! Every write redirects; one-time status messages travel as `?success=`
//! / `?error=` query parameters rendered by the target page.

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod contact;
pub mod home;
pub mod pages;
pub mod reviews;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};
use serde::Deserialize;

use crate::state::AppState;

/// Query parameters for one-time status display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Redirect carrying a one-time success message.
pub(crate) fn redirect_success(path: &str, message: &str) -> Redirect {
    Redirect::to(&format!("{path}?success={}", urlencoding::encode(message)))
}

/// Redirect carrying a one-time error message.
pub(crate) fn redirect_error(path: &str, message: &str) -> Redirect {
    Redirect::to(&format!("{path}?error={}", urlencoding::encode(message)))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show))
        .route("/place", post(checkout::place))
        .route("/success", get(checkout::success))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Product listing
        .route("/", get(home::home))
        // About page
        .route("/about", get(pages::about))
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout routes
        .nest("/checkout", checkout_routes())
        // Auth routes
        .nest("/auth", auth_routes())
        // Reviews & contact
        .route("/reviews", get(reviews::index).post(reviews::submit))
        .route("/contact", get(contact::index).post(contact::submit))
        // Everything else
        .fallback(pages::not_found)
}
