//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SPICEJAR_HOST` - Bind address (default: 127.0.0.1)
//! - `SPICEJAR_PORT` - Listen port (default: 3000)
//! - `SPICEJAR_BASE_URL` - Public URL (default: http://localhost:3000)
//! - `SPICEJAR_DATA_DIR` - Directory for append-only record files (default: data)
//! - `SPICEJAR_NOTIFY_API_BASE` - Notification relay base URL
//! - `SPICEJAR_NOTIFY_API_KEY` - Relay API key (validated for strength)
//! - `SPICEJAR_ORDER_FROM_EMAIL` - Sender address on order confirmations
//! - `SPICEJAR_NOTIFY_SMS_NUMBER` - Phone number for order SMS pushes
//! - `SPICEJAR_NOTIFY_TOPIC` - Topic id for order broadcasts
//!
//! The notification relay is enabled only when both `SPICEJAR_NOTIFY_API_BASE`
//! and `SPICEJAR_NOTIFY_API_KEY` are present; otherwise sends are logged
//! and skipped.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Directory holding the append-only record files
    pub data_dir: PathBuf,
    /// Notification relay configuration, if configured
    pub notify: Option<NotifyConfig>,
}

/// Notification relay configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct NotifyConfig {
    /// Base URL of the notification relay API
    pub api_base: String,
    /// Relay API key (server-side only)
    pub api_key: SecretString,
    /// Sender address for order confirmation emails
    pub from_email: String,
    /// Phone number to SMS when an order lands
    pub sms_number: Option<String>,
    /// Topic id for order broadcasts
    pub topic: Option<String>,
}

impl std::fmt::Debug for NotifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifyConfig")
            .field("api_base", &self.api_base)
            .field("api_key", &"[REDACTED]")
            .field("from_email", &self.from_email)
            .field("sms_number", &self.sms_number)
            .field("topic", &self.topic)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable fails to parse or a secret
    /// fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("SPICEJAR_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("SPICEJAR_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("SPICEJAR_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SPICEJAR_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("SPICEJAR_BASE_URL", "http://localhost:3000");
        let data_dir = PathBuf::from(get_env_or_default("SPICEJAR_DATA_DIR", "data"));
        let notify = NotifyConfig::from_env()?;

        Ok(Self {
            host,
            port,
            base_url,
            data_dir,
            notify,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl NotifyConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(api_base) = get_optional_env("SPICEJAR_NOTIFY_API_BASE") else {
            return Ok(None);
        };
        let api_key = get_validated_secret("SPICEJAR_NOTIFY_API_KEY")?;

        Ok(Some(Self {
            api_base,
            api_key,
            from_email: get_env_or_default("SPICEJAR_ORDER_FROM_EMAIL", "orders@spicejar.example"),
            sms_number: get_optional_env("SPICEJAR_NOTIFY_SMS_NUMBER"),
            topic: get_optional_env("SPICEJAR_NOTIFY_TOPIC"),
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real API keys have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated key."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
