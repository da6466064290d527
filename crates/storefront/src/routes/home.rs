//! Product listing route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use tracing::instrument;

use crate::catalog::Product;
use crate::filters;
use crate::middleware::RequireLogin;
use crate::routes::MessageQuery;
use crate::state::AppState;

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "home/index.html")]
pub struct ProductsTemplate {
    pub username: String,
    pub products: Vec<Product>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Display the product listing.
#[instrument(skip(state, user))]
pub async fn home(
    State(state): State<AppState>,
    RequireLogin(user): RequireLogin,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    ProductsTemplate {
        username: user.username.to_string(),
        products: state.catalog().all().to_vec(),
        error: query.error,
        success: query.success,
    }
}
