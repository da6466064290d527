//! Review route handlers.
//!
//! Anyone can read and leave reviews; a logged-in user's name is
//! attached, everyone else posts as Guest. Listing is best-effort: a
//! failing store renders an empty list with a note, never an error
//! page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;
use tracing::instrument;

use crate::middleware::OptionalLogin;
use crate::routes::{MessageQuery, redirect_error, redirect_success};
use crate::state::AppState;
use crate::stores::{RecordKind, StoredRecord};

/// Review form data.
#[derive(Debug, Deserialize)]
pub struct ReviewForm {
    pub review: String,
}

/// Reviews page template.
#[derive(Template, WebTemplate)]
#[template(path = "reviews/index.html")]
pub struct ReviewsTemplate {
    pub username: Option<String>,
    pub reviews: Vec<StoredRecord>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Display the reviews page.
#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    OptionalLogin(user): OptionalLogin,
    Query(query): Query<MessageQuery>,
) -> ReviewsTemplate {
    let (reviews, scan_error) = match state.records().scan(RecordKind::Review).await {
        Ok(reviews) => (reviews, None),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load reviews");
            (Vec::new(), Some("Could not load reviews.".to_string()))
        }
    };

    ReviewsTemplate {
        username: user.map(|u| u.username.to_string()),
        reviews,
        error: query.error.or(scan_error),
        success: query.success,
    }
}

/// Submit a review.
#[instrument(skip(state, user, form))]
pub async fn submit(
    State(state): State<AppState>,
    OptionalLogin(user): OptionalLogin,
    Form(form): Form<ReviewForm>,
) -> Redirect {
    let body = form.review.trim();
    if body.is_empty() {
        return redirect_error("/reviews", "Please write a review first.");
    }

    let author = user.map_or_else(|| "Guest".to_string(), |u| u.username.to_string());
    let record = StoredRecord::new(author, body.to_string());

    match state.records().append(RecordKind::Review, &record).await {
        Ok(()) => redirect_success("/reviews", "Thanks for your review!"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to save review");
            redirect_error("/reviews", "Could not save your review, please try again.")
        }
    }
}
