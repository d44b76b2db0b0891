//! Data Transfer Objects for billing HTTP endpoints.
//!
//! These types define the JSON request/response format for the API.
//! They are separate from domain types to allow API evolution independent of
//! the domain model.

use serde::{Deserialize, Serialize};

use crate::application::handlers::billing::WebhookOutcome;
use crate::domain::billing::WebhookError;
use crate::ports::PaymentInitialization;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to start a payment.
#[derive(Debug, Clone, Deserialize)]
pub struct InitializePaymentRequest {
    pub email: String,
    /// Amount in the currency's minor unit.
    pub amount: u64,
    #[serde(default)]
    pub callback_url: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Acknowledgement body for an accepted webhook.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebhookAckResponse {
    /// `applied`, `duplicate`, `ignored` or `unapplied`.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<&WebhookOutcome> for WebhookAckResponse {
    fn from(outcome: &WebhookOutcome) -> Self {
        let status = outcome.label().to_string();
        match outcome {
            WebhookOutcome::Applied(record) => Self {
                status,
                reference: record
                    .last_payment_reference
                    .as_ref()
                    .map(|r| r.to_string()),
                kind: None,
                reason: None,
            },
            WebhookOutcome::Duplicate(reference) => Self {
                status,
                reference: Some(reference.to_string()),
                kind: None,
                reason: Some(WebhookError::DuplicateEvent(reference.clone()).code().to_string()),
            },
            WebhookOutcome::Ignored { kind } => Self {
                status,
                reference: None,
                kind: Some(kind.clone()),
                reason: None,
            },
            WebhookOutcome::Unapplied { reference, reason } => Self {
                status,
                reference: Some(reference.to_string()),
                kind: None,
                reason: Some(reason.code().to_string()),
            },
        }
    }
}

/// Response for a started payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializePaymentResponse {
    pub authorization_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_code: Option<String>,
    pub reference: String,
}

impl From<PaymentInitialization> for InitializePaymentResponse {
    fn from(init: PaymentInitialization) -> Self {
        Self {
            authorization_url: init.authorization_url,
            access_code: init.access_code,
            reference: init.reference.to_string(),
        }
    }
}

/// Liveness probe body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Response DTO
// ════════════════════════════════════════════════════════════════════════════════

/// Standard error response for API errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}
