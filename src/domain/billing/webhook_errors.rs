//! Error types for payment webhook handling.
//!
//! Defines every condition the webhook pipeline can end in, with HTTP status
//! code mapping and retryability semantics. Status codes drive provider
//! redelivery: 2xx stops it, 5xx asks for it.

use axum::http::StatusCode;
use thiserror::Error;

use super::payment_event::ParseError;
use crate::domain::foundation::PaymentReference;

/// Errors raised by the subscription state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    /// The payer email has no matching user.
    #[error("No user registered for {0}")]
    UserNotFound(String),

    /// The provider reported the transaction as not successful.
    #[error("Provider rejected transaction {0}")]
    ProviderRejected(PaymentReference),

    /// The provider could not be reached within the retry budget.
    #[error("Provider unreachable: {0}")]
    ProviderUnreachable(String),

    /// The user directory failed or timed out.
    #[error("User directory unavailable: {0}")]
    DirectoryUnavailable(String),

    /// The subscription record could not be read or written.
    #[error("Record write failed: {0}")]
    RecordWriteFailed(String),
}

/// Errors that occur during webhook processing.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Signature header absent or not matching the body.
    #[error("Invalid signature")]
    SignatureInvalid,

    /// Verified body could not be turned into a known event.
    #[error("Malformed event: {0}")]
    MalformedEvent(#[from] ParseError),

    /// The reference was already claimed by an earlier delivery.
    #[error("Duplicate event: {0}")]
    DuplicateEvent(PaymentReference),

    /// The payer email has no matching user.
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// The provider reported the transaction as not successful.
    #[error("Provider rejected transaction {0}")]
    ProviderRejected(PaymentReference),

    /// The provider could not be reached.
    #[error("Provider unreachable: {0}")]
    ProviderUnreachable(String),

    /// Subscription record persistence failed.
    #[error("Record write failed: {0}")]
    RecordWriteFailed(String),

    /// Idempotency store or user directory failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl WebhookError {
    /// Returns true if the provider should redeliver this webhook.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WebhookError::ProviderUnreachable(_)
                | WebhookError::RecordWriteFailed(_)
                | WebhookError::Storage(_)
        )
    }

    /// Returns true if the event is acknowledged without being applied.
    ///
    /// These are operational outcomes, not faults of the sender.
    pub fn is_acknowledged(&self) -> bool {
        matches!(
            self,
            WebhookError::DuplicateEvent(_)
                | WebhookError::UserNotFound(_)
                | WebhookError::ProviderRejected(_)
        )
    }

    /// Returns true if an operator should be told about this outcome.
    pub fn needs_operator_attention(&self) -> bool {
        matches!(
            self,
            WebhookError::UserNotFound(_) | WebhookError::ProviderRejected(_)
        )
    }

    /// Stable machine-readable code used in responses and logs.
    pub fn code(&self) -> &'static str {
        match self {
            WebhookError::SignatureInvalid => "SIGNATURE_INVALID",
            WebhookError::MalformedEvent(_) => "MALFORMED_EVENT",
            WebhookError::DuplicateEvent(_) => "DUPLICATE_EVENT",
            WebhookError::UserNotFound(_) => "USER_NOT_FOUND",
            WebhookError::ProviderRejected(_) => "PROVIDER_REJECTED",
            WebhookError::ProviderUnreachable(_) => "PROVIDER_UNREACHABLE",
            WebhookError::RecordWriteFailed(_) => "RECORD_WRITE_FAILED",
            WebhookError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Maps the error to an appropriate HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            // Forged or unsigned - don't retry
            WebhookError::SignatureInvalid => StatusCode::UNAUTHORIZED,

            // Known kind missing required fields - don't retry
            WebhookError::MalformedEvent(_) => StatusCode::BAD_REQUEST,

            // Acknowledged so the provider stops redelivering
            WebhookError::DuplicateEvent(_)
            | WebhookError::UserNotFound(_)
            | WebhookError::ProviderRejected(_) => StatusCode::OK,

            WebhookError::ProviderUnreachable(_) => StatusCode::SERVICE_UNAVAILABLE,

            WebhookError::RecordWriteFailed(_) | WebhookError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<ApplyError> for WebhookError {
    fn from(err: ApplyError) -> Self {
        match err {
            ApplyError::UserNotFound(email) => WebhookError::UserNotFound(email),
            ApplyError::ProviderRejected(reference) => WebhookError::ProviderRejected(reference),
            ApplyError::ProviderUnreachable(msg) => WebhookError::ProviderUnreachable(msg),
            ApplyError::DirectoryUnavailable(msg) => WebhookError::Storage(msg),
            ApplyError::RecordWriteFailed(msg) => WebhookError::RecordWriteFailed(msg),
        }
    }
}
