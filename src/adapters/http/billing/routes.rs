//! Axum router configuration for billing endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{handle_payment_webhook, health, initialize_payment, BillingAppState};

/// Create the payment webhook router.
///
/// Webhooks carry no user authentication; they are verified via signature.
///
/// # Routes
/// - `POST /payments` - Handle payment provider webhooks
pub fn webhook_routes() -> Router<BillingAppState> {
    Router::new().route("/payments", post(handle_payment_webhook))
}

/// Create the payments API router.
///
/// # Routes
/// - `POST /initialize` - Start a checkout
pub fn payment_routes() -> Router<BillingAppState> {
    Router::new().route("/initialize", post(initialize_payment))
}

/// Create the complete billing router.
///
/// Mount at `/api`; `/health` sits at the router root.
///
/// # Example
///
/// ```ignore
/// let app = Router::new()
///     .route("/health", get(health))
///     .nest("/api", billing_router())
///     .with_state(state);
/// ```
pub fn billing_router() -> Router<BillingAppState> {
    Router::new()
        .nest("/webhooks", webhook_routes())
        .nest("/payments", payment_routes())
}

/// Full application router with state applied.
pub fn app_router(state: BillingAppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", billing_router())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryProcessedReferenceStore, InMemorySubscriptionRepository, InMemoryUserDirectory,
    };
    use crate::adapters::alerts::TracingOperatorNotifier;
    use crate::application::handlers::billing::{
        ApplyChargeSettings, ApplyChargeSucceededHandler, HandlePaymentWebhookHandler,
        InitializePaymentHandler,
    };
    use crate::domain::billing::{sign_payload, WebhookVerifier};
    use crate::domain::foundation::{PaymentReference, UserId};
    use crate::ports::{
        InitializeTransactionRequest, PaymentError, PaymentGateway, PaymentInitialization,
        TransactionVerification,
    };
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{HeaderName, Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    const SECRET: &str = "sk_test_routes";

    struct StubGateway;

    #[async_trait]
    impl PaymentGateway for StubGateway {
        async fn verify_transaction(&self, _reference: &PaymentReference) -> TransactionVerification {
            TransactionVerification::Success
        }

        async fn initialize_transaction(
            &self,
            request: InitializeTransactionRequest,
        ) -> Result<PaymentInitialization, PaymentError> {
            Ok(PaymentInitialization {
                authorization_url: "https://checkout.example.com/x".to_string(),
                access_code: None,
                reference: request.reference,
            })
        }
    }

    fn test_state() -> BillingAppState {
        let gateway = Arc::new(StubGateway);
        let directory = Arc::new(
            InMemoryUserDirectory::new().with_user("a@example.com", UserId::new("user-1").unwrap()),
        );
        let apply = Arc::new(ApplyChargeSucceededHandler::new(
            directory,
            Arc::new(InMemorySubscriptionRepository::new()),
            gateway.clone(),
            ApplyChargeSettings::default(),
        ));
        let webhook = HandlePaymentWebhookHandler::new(
            WebhookVerifier::new(SECRET),
            Arc::new(InMemoryProcessedReferenceStore::new()),
            apply,
            Arc::new(TracingOperatorNotifier::new()),
        );

        BillingAppState::new(
            Arc::new(webhook),
            Arc::new(InitializePaymentHandler::new(gateway)),
        )
    }

    fn webhook_request(body: &str, signature: Option<String>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/webhooks/payments")
            .header("content-type", "application/json");
        if let Some(signature) = signature {
            builder = builder.header("x-paystack-signature", signature);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    const CHARGE: &str = r#"{"event":"charge.success","data":{"reference":"ref-123","paid_at":"2024-03-10T00:00:00Z","customer":{"email":"a@example.com"}}}"#;

    #[tokio::test]
    async fn webhook_route_exists() {
        let app = app_router(test_state());

        let response = app.oneshot(webhook_request("{}", None)).await.unwrap();

        // Should not be 404 (route exists)
        assert_ne!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unsigned_webhook_is_unauthorized() {
        let app = app_router(test_state());

        let response = app.oneshot(webhook_request(CHARGE, None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn signed_webhook_is_acknowledged() {
        let app = app_router(test_state());
        let signature = sign_payload(SECRET, CHARGE.as_bytes());

        let response = app
            .oneshot(webhook_request(CHARGE, Some(signature)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn custom_signature_header_is_honoured() {
        let state = test_state().with_signature_header(HeaderName::from_static("x-signature"));
        let app = app_router(state);
        let request = Request::builder()
            .method("POST")
            .uri("/api/webhooks/payments")
            .header("x-signature", sign_payload(SECRET, CHARGE.as_bytes()))
            .body(Body::from(CHARGE))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn initialize_route_returns_checkout() {
        let app = app_router(test_state());
        let request = Request::builder()
            .method("POST")
            .uri("/api/payments/initialize")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"email":"a@example.com","amount":5000}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_route_is_ok() {
        let app = app_router(test_state());
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn webhook_rejects_get() {
        let app = app_router(test_state());
        let request = Request::builder()
            .method("GET")
            .uri("/api/webhooks/payments")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
