//! Authentication route handlers.
//!
//! Login, registration, and logout against the local account
//! directory. Login failures redirect back with a one-time message;
//! logout flushes the whole session, cart included.

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

use crate::middleware::{clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::routes::{MessageQuery, redirect_error, redirect_success};
use crate::services::AuthError;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Registration form data.
#[derive(Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    let error = query.error.map(|code| match code.as_str() {
        "login_required" => "Please log in to continue.".to_string(),
        other => other.to_string(),
    });

    LoginTemplate {
        error,
        success: query.success,
    }
}

/// Handle login form submission.
#[instrument(skip(state, session, form), fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    match state.auth().authenticate(&form.username, &form.password).await {
        Ok(username) => {
            let user = CurrentUser { username };
            if let Err(e) = set_current_user(&session, &user).await {
                tracing::error!("Failed to set session: {e}");
                return redirect_error("/auth/login", "Session error, please try again")
                    .into_response();
            }

            redirect_success("/", "Logged in successfully!").into_response()
        }
        Err(e) => {
            tracing::warn!("Login failed: {e}");
            redirect_error("/auth/login", "Invalid username or password.").into_response()
        }
    }
}

/// Display the registration page.
pub async fn register_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    RegisterTemplate { error: query.error }
}

/// Handle registration form submission.
#[instrument(skip(state, form), fields(username = %form.username))]
pub async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Response {
    match state.auth().register(&form.username, &form.password).await {
        Ok(username) => {
            tracing::info!(%username, "Account registered");
            redirect_success("/auth/login", "Registered successfully. Please login.")
                .into_response()
        }
        Err(e @ (AuthError::UsernameTaken | AuthError::MissingCredentials)) => {
            redirect_error("/auth/register", &e.to_string()).into_response()
        }
        Err(e) => {
            tracing::error!("Registration failed: {e}");
            redirect_error("/auth/register", "Registration failed, please try again")
                .into_response()
        }
    }
}

/// Handle logout.
///
/// Destroys the entire session: identity and cart.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Redirect {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session identity: {e}");
    }

    // Also destroy the entire session, cart included
    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {e}");
    }

    redirect_success("/auth/login", "Logged out successfully.")
}
