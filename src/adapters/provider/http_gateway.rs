//! HTTP payment gateway adapter.
//!
//! Implements the `PaymentGateway` port against the provider's REST API
//! with a bearer secret key.
//!
//! # Configuration
//!
//! ```ignore
//! let config = HttpGatewayConfig::new(secret_key)
//!     .with_base_url("https://api.paystack.co")
//!     .with_timeout(Duration::from_secs(5));
//! let gateway = HttpPaymentGateway::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use crate::domain::foundation::PaymentReference;
use crate::ports::{
    InitializeTransactionRequest, PaymentError, PaymentErrorCode, PaymentGateway,
    PaymentInitialization, TransactionVerification,
};

use super::wire_types::{
    Envelope, InitializeBody, InitializedTransaction, VerifiedTransaction, SUCCESS_STATUS,
};

/// Default provider API root.
pub const DEFAULT_BASE_URL: &str = "https://api.paystack.co";

/// Gateway configuration.
#[derive(Clone)]
pub struct HttpGatewayConfig {
    /// Account secret key, sent as the bearer credential.
    secret_key: SecretString,

    /// API root without trailing slash.
    base_url: String,

    /// Budget for a single provider call.
    timeout: Duration,

    /// Extra attempts after a failed verification call.
    max_retries: u32,
}

impl HttpGatewayConfig {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: SecretString::new(secret_key.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(5),
            max_retries: 1,
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

impl std::fmt::Debug for HttpGatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGatewayConfig")
            .field("secret_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

/// Payment gateway speaking the provider's REST API over reqwest.
pub struct HttpPaymentGateway {
    config: HttpGatewayConfig,
    http_client: reqwest::Client,
}

impl HttpPaymentGateway {
    /// Create a gateway with the given configuration.
    pub fn new(config: HttpGatewayConfig) -> Result<Self, PaymentError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PaymentError::network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Verification endpoint for `reference`, escaped as a single path segment.
    fn verify_url(&self, reference: &PaymentReference) -> Result<Url, String> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| format!("invalid provider URL: {}", e))?;
        url.path_segments_mut()
            .map_err(|_| "provider URL cannot carry a path".to_string())?
            .pop_if_empty()
            .extend(["transaction", "verify", reference.as_str()]);
        Ok(url)
    }

    /// One verification attempt. `Err` means no usable answer.
    async fn verify_once(&self, reference: &PaymentReference) -> Result<TransactionVerification, String> {
        let url = self.verify_url(reference)?;

        let request = self
            .http_client
            .get(url)
            .bearer_auth(self.config.secret_key.expose_secret())
            .send();

        let response = tokio::time::timeout(self.config.timeout, request)
            .await
            .map_err(|_| format!("timed out after {:?}", self.config.timeout))?
            .map_err(|e| e.to_string())?;

        let status = response.status();
        let body = response.text().await.map_err(|e| e.to_string())?;

        classify_verification(status, &body)
    }
}

/// Interprets a verification response.
///
/// The provider answers 400 or 404 for references it does not know; both
/// count as a definite "not successful". Server errors, throttling and
/// credential failures carry no answer about the transaction.
fn classify_verification(status: StatusCode, body: &str) -> Result<TransactionVerification, String> {
    if status == StatusCode::NOT_FOUND || status == StatusCode::BAD_REQUEST {
        return Ok(TransactionVerification::NotSuccess {
            status: "not_found".to_string(),
        });
    }

    if !status.is_success() {
        return Err(format!("provider returned {}", status));
    }

    let envelope: Envelope<VerifiedTransaction> =
        serde_json::from_str(body).map_err(|e| format!("unparsable response: {}", e))?;

    match envelope.data {
        Some(data) if data.status == SUCCESS_STATUS => Ok(TransactionVerification::Success),
        Some(data) => Ok(TransactionVerification::NotSuccess {
            status: data.status,
        }),
        None if !envelope.status => Ok(TransactionVerification::NotSuccess {
            status: envelope.message,
        }),
        None => Err("response without data".to_string()),
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn verify_transaction(&self, reference: &PaymentReference) -> TransactionVerification {
        let mut reason = String::new();

        for attempt in 0..=self.config.max_retries {
            match self.verify_once(reference).await {
                Ok(verification) => return verification,
                Err(e) => {
                    tracing::warn!(
                        reference = %reference,
                        attempt = attempt + 1,
                        error = %e,
                        "Provider verification attempt failed"
                    );
                    reason = e;
                }
            }
        }

        TransactionVerification::Unreachable { reason }
    }

    async fn initialize_transaction(
        &self,
        request: InitializeTransactionRequest,
    ) -> Result<PaymentInitialization, PaymentError> {
        let url = format!("{}/transaction/initialize", self.config.base_url);

        let body = InitializeBody {
            email: &request.email,
            amount: request.amount_minor.to_string(),
            reference: request.reference.as_str(),
            callback_url: request.callback_url.as_deref(),
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(self.config.secret_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PaymentError::new(PaymentErrorCode::Timeout, e.to_string())
                } else {
                    PaymentError::network(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(PaymentError::new(
                PaymentErrorCode::AuthenticationError,
                "Provider rejected the secret key",
            ));
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, error = %error_text, "Provider initialize failed");
            let code = if status.is_client_error() {
                PaymentErrorCode::InvalidRequest
            } else {
                PaymentErrorCode::ProviderError
            };
            return Err(PaymentError::new(
                code,
                format!("Provider API error: {}", error_text),
            ));
        }

        let envelope: Envelope<InitializedTransaction> = response.json().await.map_err(|e| {
            PaymentError::provider(format!("Failed to parse provider response: {}", e))
        })?;

        let data = envelope
            .data
            .ok_or_else(|| PaymentError::provider(envelope.message.clone()))?;

        let reference = PaymentReference::new(data.reference)
            .map_err(|e| PaymentError::provider(e.to_string()))?;

        Ok(PaymentInitialization {
            authorization_url: data.authorization_url,
            access_code: data.access_code,
            reference,
        })
    }
}
