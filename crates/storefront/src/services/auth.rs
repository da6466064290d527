//! Authentication service.
//!
//! Registration and credential checks over the account store. Passwords
//! are hashed with Argon2id; the stored credential is never the
//! password itself.

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

use spicejar_core::Username;

use crate::stores::{AccountStore, StoreError};

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username or password is empty after trimming.
    #[error("please enter both username and password")]
    MissingCredentials,

    /// The username is already registered.
    #[error("username already exists")]
    UsernameTaken,

    /// Unknown username or wrong password.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Password hashing failed.
    #[error("failed to hash password")]
    PasswordHash,

    /// The account store failed.
    #[error("account store error: {0}")]
    Store(StoreError),
}

/// Authentication service over an injectable account store.
#[derive(Clone)]
pub struct AuthService {
    accounts: Arc<dyn AccountStore>,
}

impl AuthService {
    /// Create a new authentication service.
    #[must_use]
    pub fn new(accounts: Arc<dyn AccountStore>) -> Self {
        Self { accounts }
    }

    /// Register a new account.
    ///
    /// Both fields are trimmed before validation. No password
    /// complexity rules beyond non-emptiness.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingCredentials` if either field is empty
    /// after trimming, `AuthError::UsernameTaken` if the username is
    /// already registered.
    pub async fn register(&self, username: &str, password: &str) -> Result<Username, AuthError> {
        let username = Username::parse(username).map_err(|_| AuthError::MissingCredentials)?;
        let password = password.trim();
        if password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let password_hash = hash_password(password)?;

        self.accounts
            .insert_new(&username, &password_hash)
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AuthError::UsernameTaken,
                other => AuthError::Store(other),
            })?;

        Ok(username)
    }

    /// Check credentials and return the authenticated identity.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` on any mismatch - an
    /// unknown username and a wrong password are indistinguishable to
    /// the caller.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Username, AuthError> {
        let username = Username::parse(username).map_err(|_| AuthError::InvalidCredentials)?;

        let password_hash = self
            .accounts
            .password_hash(&username)
            .await
            .map_err(AuthError::Store)?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password.trim(), &password_hash)?;

        Ok(username)
    }
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
