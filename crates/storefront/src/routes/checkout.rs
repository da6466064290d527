//! Checkout and order placement route handlers.
//!
//! The checkout page is a pure snapshot of the cart - reloading it any
//! number of times changes nothing. Placing the order is the one-way
//! door: the cart empties no matter what the collaborators do.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireLogin;
use crate::models::{CartTotals, CheckoutDetails};
use crate::routes::cart::{load_cart, lock_key, save_cart};
use crate::routes::{MessageQuery, redirect_success};
use crate::state::AppState;

/// Checkout form data.
#[derive(Debug, Deserialize)]
pub struct PlaceOrderForm {
    pub name: String,
    pub address: String,
    pub email: String,
    pub phone: String,
}

/// Checkout review page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub username: String,
    pub cart: CartTotals,
    pub error: Option<String>,
}

/// Order confirmation page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/success.html")]
pub struct OrderSuccessTemplate {
    pub username: String,
    pub success: Option<String>,
}

/// Display the checkout review.
#[instrument(skip(state, session, user))]
pub async fn show(
    State(state): State<AppState>,
    RequireLogin(user): RequireLogin,
    session: Session,
    Query(query): Query<MessageQuery>,
) -> Result<CheckoutTemplate> {
    let cart = load_cart(&session).await?;

    Ok(CheckoutTemplate {
        username: user.username.to_string(),
        cart: cart.totals(state.catalog()),
        error: query.error,
    })
}

/// Place the order.
///
/// The cart is cleared in the session before the durable write and the
/// confirmation email are even attempted; an empty cart places an
/// empty order rather than being rejected.
#[instrument(skip(state, session, user, form))]
pub async fn place(
    State(state): State<AppState>,
    RequireLogin(user): RequireLogin,
    session: Session,
    Form(form): Form<PlaceOrderForm>,
) -> Result<Redirect> {
    let details = CheckoutDetails {
        name: form.name.trim().to_string(),
        address: form.address.trim().to_string(),
        email: form.email.trim().to_string(),
        phone: form.phone.trim().to_string(),
    };

    let lock = state.cart_locks().get(&lock_key(&session));
    let _guard = lock.lock().await;

    let mut cart = load_cart(&session).await?;
    let snapshot = state
        .orders()
        .place(&mut cart, state.catalog(), &user.username, details);
    save_cart(&session, &cart).await?;

    tracing::info!(order_id = %snapshot.order_id, "Checkout complete");
    Ok(redirect_success(
        "/checkout/success",
        "Your order has been placed successfully!",
    ))
}

/// Display the order confirmation.
#[instrument(skip(user))]
pub async fn success(
    RequireLogin(user): RequireLogin,
    Query(query): Query<MessageQuery>,
) -> OrderSuccessTemplate {
    OrderSuccessTemplate {
        username: user.username.to_string(),
        success: query.success,
    }
}
