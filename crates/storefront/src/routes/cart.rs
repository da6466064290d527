//! Cart route handlers.
//!
//! Cart state lives in the session. Every mutation is a
//! read-modify-write cycle run under the session's lock, then a
//! redirect back to the page the buyer came from.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use spicejar_core::ProductId;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireLogin;
use crate::models::{Cart, CartTotals, session_keys};
use crate::routes::{MessageQuery, redirect_error, redirect_success};
use crate::state::AppState;

// =============================================================================
// Session Helpers
// =============================================================================

/// Lock registry key for the current session.
///
/// A session that has never been saved has no id yet; those requests
/// share the empty key, which is harmless - there is no prior state to
/// lose.
pub(crate) fn lock_key(session: &Session) -> String {
    session.id().map_or_else(String::new, |id| id.to_string())
}

/// Load the cart from the session, empty if absent.
pub(crate) async fn load_cart(session: &Session) -> Result<Cart> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

/// Write the cart back to the session.
pub(crate) async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session.insert(session_keys::CART, cart).await?;
    Ok(())
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i32,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: i32,
    pub delta: i32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: i32,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub username: String,
    pub cart: CartTotals,
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart page.
#[instrument(skip(state, session, user))]
pub async fn show(
    State(state): State<AppState>,
    RequireLogin(user): RequireLogin,
    session: Session,
    Query(query): Query<MessageQuery>,
) -> Result<Response> {
    let cart = load_cart(&session).await?;

    Ok(CartShowTemplate {
        username: user.username.to_string(),
        cart: cart.totals(state.catalog()),
        error: query.error,
        success: query.success,
    }
    .into_response())
}

/// Add one of a product to the cart.
#[instrument(skip(state, session, _user))]
pub async fn add(
    State(state): State<AppState>,
    RequireLogin(_user): RequireLogin,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let id = ProductId::new(form.product_id);

    let lock = state.cart_locks().get(&lock_key(&session));
    let _guard = lock.lock().await;

    let mut cart = load_cart(&session).await?;
    if cart.add(state.catalog(), id).is_err() {
        tracing::warn!(product_id = %id, "Attempt to add unknown product");
        return Ok(redirect_error("/", "Product not found").into_response());
    }
    save_cart(&session, &cart).await?;

    // The add above proved the product exists.
    let name = state
        .catalog()
        .lookup(id)
        .map_or_else(|| "Product".to_string(), |p| p.name.clone());
    Ok(redirect_success("/", &format!("{name} added to cart")).into_response())
}

/// Change a line's quantity by ±1.
#[instrument(skip(state, session, _user))]
pub async fn update(
    State(state): State<AppState>,
    RequireLogin(_user): RequireLogin,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Redirect> {
    let lock = state.cart_locks().get(&lock_key(&session));
    let _guard = lock.lock().await;

    let mut cart = load_cart(&session).await?;
    cart.change_quantity(ProductId::new(form.product_id), form.delta)?;
    save_cart(&session, &cart).await?;

    Ok(Redirect::to("/cart"))
}

/// Drop a line from the cart.
#[instrument(skip(state, session, _user))]
pub async fn remove(
    State(state): State<AppState>,
    RequireLogin(_user): RequireLogin,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Redirect> {
    let lock = state.cart_locks().get(&lock_key(&session));
    let _guard = lock.lock().await;

    let mut cart = load_cart(&session).await?;
    cart.remove(ProductId::new(form.product_id));
    save_cart(&session, &cart).await?;

    Ok(Redirect::to("/cart"))
}
