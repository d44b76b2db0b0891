//! Payment gateway port - Outbound calls to the payment provider.
//!
//! Two calls are needed: confirming a transaction by reference before a
//! webhook body is trusted, and initialising a new transaction for the
//! payment API. Everything else about the provider is out of reach of the
//! domain.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode, PaymentReference};

/// Port for the payment provider's REST API.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Asks the provider for the status of a transaction.
    ///
    /// Never fails: transport problems are reported as
    /// [`TransactionVerification::Unreachable`].
    async fn verify_transaction(&self, reference: &PaymentReference) -> TransactionVerification;

    /// Starts a new transaction and returns where the payer completes it.
    async fn initialize_transaction(
        &self,
        request: InitializeTransactionRequest,
    ) -> Result<PaymentInitialization, PaymentError>;
}

/// Provider's answer to "did this transaction succeed".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionVerification {
    /// The provider confirms the charge.
    Success,
    /// The provider knows the transaction but it did not succeed.
    NotSuccess { status: String },
    /// No usable answer within the retry budget.
    Unreachable { reason: String },
}

/// Request to initialise a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeTransactionRequest {
    /// Payer email.
    pub email: String,

    /// Amount in the currency's minor unit.
    pub amount_minor: u64,

    /// Reference to assign to the transaction.
    pub reference: PaymentReference,

    /// Where the provider redirects after checkout.
    pub callback_url: Option<String>,
}

/// Result of initialising a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInitialization {
    /// Hosted checkout URL for the payer.
    pub authorization_url: String,

    /// Provider access code for the checkout.
    pub access_code: Option<String>,

    /// Reference of the created transaction.
    pub reference: PaymentReference,
}

/// Errors from payment gateway operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl PaymentError {
    /// Create a new payment error.
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            retryable: code.is_retryable(),
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    /// Create a provider API error.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderError, message)
    }

    /// Create an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidRequest, message)
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

impl From<PaymentError> for DomainError {
    fn from(err: PaymentError) -> Self {
        let code = match err.code {
            PaymentErrorCode::InvalidRequest => ErrorCode::ValidationFailed,
            PaymentErrorCode::Timeout => ErrorCode::Timeout,
            _ => ErrorCode::ProviderError,
        };

        DomainError::new(code, err.message)
    }
}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// Call exceeded its time budget.
    Timeout,

    /// API authentication failed.
    AuthenticationError,

    /// Request rejected by validation.
    InvalidRequest,

    /// Provider API error.
    ProviderError,
}

impl PaymentErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PaymentErrorCode::NetworkError | PaymentErrorCode::Timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_gateway_is_object_safe() {
        fn _accepts_dyn(_gateway: &dyn PaymentGateway) {}
    }

    #[test]
    fn network_errors_are_retryable() {
        assert!(PaymentError::network("reset").retryable);
        assert!(PaymentError::new(PaymentErrorCode::Timeout, "slow").retryable);
    }

    #[test]
    fn provider_errors_are_not_retryable() {
        assert!(!PaymentError::provider("400").retryable);
        assert!(!PaymentError::invalid_request("bad email").retryable);
    }

    #[test]
    fn converts_to_domain_error() {
        let err: DomainError = PaymentError::invalid_request("amount").into();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let err: DomainError = PaymentError::network("refused").into();
        assert_eq!(err.code, ErrorCode::ProviderError);
    }

    #[test]
    fn display_includes_code_and_message() {
        let err = PaymentError::provider("Invalid key");
        assert_eq!(err.to_string(), "ProviderError: Invalid key");
    }
}
