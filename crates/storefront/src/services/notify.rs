//! Notification gateway client.
//!
//! Order confirmations go out through an HTTP notification relay that
//! fans out to email, SMS, and topic subscribers. Every send is
//! best-effort: the order workflow logs failures and moves on, so this
//! client never has to be reliable, only honest about errors.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::NotifyConfig;

/// Errors from the notification relay.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Relay returned an error response.
    #[error("relay error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The relay is not configured.
    #[error("notification relay not configured")]
    NotConfigured,

    /// Client construction failed.
    #[error("client error: {0}")]
    Client(String),
}

/// Outbound notification channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send an email.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError` if the send fails.
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError>;

    /// Send an SMS to a phone number.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError` if the send fails.
    async fn send_sms(&self, number: &str, message: &str) -> Result<(), NotifyError>;

    /// Publish a message to a topic.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError` if the publish fails.
    async fn publish_topic(&self, topic: &str, message: &str) -> Result<(), NotifyError>;
}

// =============================================================================
// HTTP relay client
// =============================================================================

/// HTTP client for the notification relay API.
#[derive(Clone)]
pub struct RelayNotifier {
    client: reqwest::Client,
    api_base: String,
    from_email: String,
}

impl RelayNotifier {
    /// Create a relay client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError::Client` if the HTTP client fails to build.
    pub fn new(config: &NotifyConfig) -> Result<Self, NotifyError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.api_key.expose_secret());
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&auth_value)
                .map_err(|e| NotifyError::Client(format!("invalid API key format: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| NotifyError::Client(e.to_string()))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            from_email: config.from_email.clone(),
        })
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> Result<(), NotifyError> {
        let url = format!("{}{path}", self.api_base);
        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NotifyError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl Notifier for RelayNotifier {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        self.post(
            "/v1/email",
            serde_json::json!({
                "from": self.from_email,
                "to": to,
                "subject": subject,
                "body": body,
            }),
        )
        .await
    }

    async fn send_sms(&self, number: &str, message: &str) -> Result<(), NotifyError> {
        self.post(
            "/v1/sms",
            serde_json::json!({
                "number": number,
                "message": message,
            }),
        )
        .await
    }

    async fn publish_topic(&self, topic: &str, message: &str) -> Result<(), NotifyError> {
        self.post(
            "/v1/topic",
            serde_json::json!({
                "topic": topic,
                "message": message,
            }),
        )
        .await
    }
}

// =============================================================================
// Disabled fallback
// =============================================================================

/// Notifier used when no relay is configured: logs the skip and
/// succeeds, matching the workflow's fire-and-forget contract.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    async fn send_email(&self, to: &str, _subject: &str, _body: &str) -> Result<(), NotifyError> {
        tracing::info!(%to, "Notification relay not configured, email skipped");
        Ok(())
    }

    async fn send_sms(&self, number: &str, _message: &str) -> Result<(), NotifyError> {
        tracing::info!(%number, "Notification relay not configured, SMS skipped");
        Ok(())
    }

    async fn publish_topic(&self, topic: &str, _message: &str) -> Result<(), NotifyError> {
        tracing::info!(%topic, "Notification relay not configured, topic publish skipped");
        Ok(())
    }
}
