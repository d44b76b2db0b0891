//! Payment configuration

use axum::http::HeaderName;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Payment provider configuration
#[derive(Clone, Default, Deserialize)]
pub struct PaymentConfig {
    /// Account secret key, used as the API bearer credential
    pub secret_key: String,

    /// Webhook signing secret; the provider signs with the secret key when unset
    pub webhook_secret: Option<String>,

    /// Provider API root
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Header carrying the webhook body signature
    #[serde(default = "default_signature_header")]
    pub signature_header: String,

    /// Confirm each charge with the provider before applying it
    #[serde(default)]
    pub verify_with_provider: bool,

    /// Budget for one provider call in seconds
    #[serde(default = "default_provider_timeout")]
    pub provider_timeout_secs: u64,

    /// Extra attempts after a failed verification call
    #[serde(default = "default_provider_max_retries")]
    pub provider_max_retries: u32,
}

impl PaymentConfig {
    /// Secret used to verify webhook signatures.
    pub fn effective_webhook_secret(&self) -> &str {
        self.webhook_secret.as_deref().unwrap_or(&self.secret_key)
    }

    /// Check if using a test-mode key
    pub fn is_test_mode(&self) -> bool {
        self.secret_key.starts_with("sk_test_")
    }

    /// Check if using a live-mode key
    pub fn is_live_mode(&self) -> bool {
        self.secret_key.starts_with("sk_live_")
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    /// Budget for a whole verification including retries.
    pub fn verification_budget(&self) -> Duration {
        self.provider_timeout() * (self.provider_max_retries + 1) + Duration::from_secs(1)
    }

    /// Parsed signature header name.
    pub fn signature_header_name(&self) -> Result<HeaderName, ValidationError> {
        HeaderName::from_bytes(self.signature_header.to_ascii_lowercase().as_bytes())
            .map_err(|_| ValidationError::InvalidSignatureHeader)
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.secret_key.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__SECRET_KEY"));
        }
        if !self.secret_key.starts_with("sk_") {
            return Err(ValidationError::InvalidSecretKey);
        }
        if matches!(&self.webhook_secret, Some(s) if s.is_empty()) {
            return Err(ValidationError::EmptyWebhookSecret);
        }
        if !self.base_url.starts_with("https://") && !self.base_url.starts_with("http://") {
            return Err(ValidationError::InvalidProviderUrl);
        }
        if self.provider_timeout_secs == 0 || self.provider_timeout_secs > 60 {
            return Err(ValidationError::InvalidTimeout("payment.provider_timeout_secs"));
        }
        if self.provider_max_retries > 3 {
            return Err(ValidationError::TooManyRetries);
        }
        self.signature_header_name()?;
        Ok(())
    }
}

impl std::fmt::Debug for PaymentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentConfig")
            .field("secret_key", &"[REDACTED]")
            .field("webhook_secret", &self.webhook_secret.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("signature_header", &self.signature_header)
            .field("verify_with_provider", &self.verify_with_provider)
            .field("provider_timeout_secs", &self.provider_timeout_secs)
            .field("provider_max_retries", &self.provider_max_retries)
            .finish()
    }
}

fn default_base_url() -> String {
    "https://api.paystack.co".to_string()
}

fn default_signature_header() -> String {
    "x-paystack-signature".to_string()
}

fn default_provider_timeout() -> u64 {
    5
}

fn default_provider_max_retries() -> u32 {
    1
}
