//! HTTP handlers for billing endpoints.
//!
//! These handlers connect Axum routes to application layer command handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::http::{HeaderMap, HeaderName, StatusCode};
use axum::response::IntoResponse;

use crate::application::handlers::billing::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, InitializePaymentCommand,
    InitializePaymentHandler,
};
use crate::domain::billing::WebhookError;
use crate::domain::foundation::Timestamp;
use crate::ports::{PaymentError, PaymentErrorCode};

use super::dto::{
    ErrorResponse, HealthResponse, InitializePaymentRequest, InitializePaymentResponse,
    WebhookAckResponse,
};

/// Header the provider puts the body signature in.
pub const DEFAULT_SIGNATURE_HEADER: &str = "x-paystack-signature";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Handlers are built once at startup: the webhook pipeline owns the per-user
/// locks, which must be shared by every request.
#[derive(Clone)]
pub struct BillingAppState {
    pub webhook_handler: Arc<HandlePaymentWebhookHandler>,
    pub initialize_payment_handler: Arc<InitializePaymentHandler>,
    pub signature_header: HeaderName,
}

impl BillingAppState {
    pub fn new(
        webhook_handler: Arc<HandlePaymentWebhookHandler>,
        initialize_payment_handler: Arc<InitializePaymentHandler>,
    ) -> Self {
        Self {
            webhook_handler,
            initialize_payment_handler,
            signature_header: HeaderName::from_static(DEFAULT_SIGNATURE_HEADER),
        }
    }

    pub fn with_signature_header(mut self, header: HeaderName) -> Self {
        self.signature_header = header;
        self
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/webhooks/payments - Handle payment provider webhooks
///
/// Takes the body as raw bytes; the signature covers the exact bytes sent.
pub async fn handle_payment_webhook(
    State(state): State<BillingAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, BillingApiError> {
    let signature = headers
        .get(&state.signature_header)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let cmd = HandlePaymentWebhookCommand {
        payload: body.to_vec(),
        signature,
        received_at: Timestamp::now(),
    };

    let outcome = state.webhook_handler.handle(cmd).await?;

    Ok((StatusCode::OK, Json(WebhookAckResponse::from(&outcome))))
}

/// POST /api/payments/initialize - Start a checkout
pub async fn initialize_payment(
    State(state): State<BillingAppState>,
    Json(request): Json<InitializePaymentRequest>,
) -> Result<impl IntoResponse, BillingApiError> {
    let cmd = InitializePaymentCommand {
        email: request.email,
        amount_minor: request.amount,
        callback_url: request.callback_url,
    };

    let initialization = state.initialize_payment_handler.handle(cmd).await?;

    Ok(Json(InitializePaymentResponse::from(initialization)))
}

/// GET /health - Liveness probe
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts application errors to HTTP responses.
#[derive(Debug)]
pub enum BillingApiError {
    Webhook(WebhookError),
    Payment(PaymentError),
}

impl From<WebhookError> for BillingApiError {
    fn from(err: WebhookError) -> Self {
        Self::Webhook(err)
    }
}

impl From<PaymentError> for BillingApiError {
    fn from(err: PaymentError) -> Self {
        Self::Payment(err)
    }
}

impl IntoResponse for BillingApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message) = match &self {
            BillingApiError::Webhook(err) => (err.status_code(), err.code(), err.to_string()),
            BillingApiError::Payment(err) => {
                let (status, code) = match err.code {
                    PaymentErrorCode::InvalidRequest => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
                    PaymentErrorCode::NetworkError | PaymentErrorCode::Timeout => {
                        (StatusCode::SERVICE_UNAVAILABLE, "PROVIDER_UNAVAILABLE")
                    }
                    PaymentErrorCode::AuthenticationError | PaymentErrorCode::ProviderError => {
                        (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR")
                    }
                };
                (status, code, err.message.clone())
            }
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}
