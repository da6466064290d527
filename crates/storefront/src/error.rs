//! Unified error handling.
//!
//! Provides a unified `AppError` covering the storefront's error
//! taxonomy. Route handlers return `Result<T, AppError>`; server-side
//! failures are logged before the response is built.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::cart::CartError;
use crate::services::auth::AuthError;
use crate::stores::StoreError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Unknown product or resource.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed input, e.g. an illegal quantity delta.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Duplicate registration.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Bad credentials or missing login.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Persistence or notification collaborator failed. Swallowed and
    /// logged on the order path; only reaches a response elsewhere.
    #[error("Dependency error: {0}")]
    Dependency(String),

    /// Session read or write failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::UnknownProduct(id) => Self::NotFound(format!("product {id}")),
            CartError::InvalidDelta(_) => Self::BadRequest(err.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => Self::BadRequest(err.to_string()),
            AuthError::UsernameTaken => Self::Conflict(err.to_string()),
            AuthError::InvalidCredentials => Self::Unauthorized(err.to_string()),
            AuthError::PasswordHash | AuthError::Store(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::Dependency(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Session(_) | Self::Internal(_) | Self::Dependency(_)) {
            tracing::error!(error = %self, "Request error");
        }

        let status = match &self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Dependency(_) => StatusCode::BAD_GATEWAY,
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Session(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Dependency(_) => "Service temporarily unavailable".to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
