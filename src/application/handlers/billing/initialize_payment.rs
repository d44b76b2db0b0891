//! InitializePaymentHandler - Starts a checkout with the payment provider.

use std::sync::Arc;

use crate::domain::foundation::PaymentReference;
use crate::ports::{InitializeTransactionRequest, PaymentError, PaymentGateway, PaymentInitialization};

/// Command to initialise a payment.
#[derive(Debug, Clone)]
pub struct InitializePaymentCommand {
    pub email: String,
    /// Amount in the currency's minor unit.
    pub amount_minor: u64,
    pub callback_url: Option<String>,
}

pub struct InitializePaymentHandler {
    gateway: Arc<dyn PaymentGateway>,
}

impl InitializePaymentHandler {
    pub fn new(gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { gateway }
    }

    pub async fn handle(
        &self,
        cmd: InitializePaymentCommand,
    ) -> Result<PaymentInitialization, PaymentError> {
        let email = cmd.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(PaymentError::invalid_request("A valid email is required"));
        }
        if cmd.amount_minor == 0 {
            return Err(PaymentError::invalid_request("Amount must be positive"));
        }

        let reference = PaymentReference::generate();
        let request = InitializeTransactionRequest {
            email: email.to_string(),
            amount_minor: cmd.amount_minor,
            reference: reference.clone(),
            callback_url: cmd.callback_url,
        };

        let initialization = self.gateway.initialize_transaction(request).await.map_err(|e| {
            tracing::error!(reference = %reference, error = %e, "Payment initialisation failed");
            e
        })?;

        tracing::info!(
            reference = %initialization.reference,
            amount_minor = cmd.amount_minor,
            "Payment initialised"
        );

        Ok(initialization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{PaymentErrorCode, TransactionVerification};
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct MockGateway {
        requests: Mutex<Vec<InitializeTransactionRequest>>,
        fail_with: Option<PaymentError>,
    }

    #[async_trait]
    impl PaymentGateway for MockGateway {
        async fn verify_transaction(&self, _reference: &PaymentReference) -> TransactionVerification {
            TransactionVerification::Success
        }

        async fn initialize_transaction(
            &self,
            request: InitializeTransactionRequest,
        ) -> Result<PaymentInitialization, PaymentError> {
            if let Some(err) = &self.fail_with {
                return Err(err.clone());
            }
            let reference = request.reference.clone();
            self.requests.lock().await.push(request);
            Ok(PaymentInitialization {
                authorization_url: format!("https://checkout.example.com/{}", reference),
                access_code: Some("code".to_string()),
                reference,
            })
        }
    }

    fn command(email: &str, amount_minor: u64) -> InitializePaymentCommand {
        InitializePaymentCommand {
            email: email.to_string(),
            amount_minor,
            callback_url: Some("https://app.example.com/paid".to_string()),
        }
    }

    #[tokio::test]
    async fn initialises_with_generated_reference() {
        let gateway = Arc::new(MockGateway::default());
        let handler = InitializePaymentHandler::new(gateway.clone());

        let result = handler.handle(command("a@example.com", 500_000)).await.unwrap();

        let requests = gateway.requests.lock().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].amount_minor, 500_000);
        assert_eq!(requests[0].reference, result.reference);
        assert!(result.reference.as_str().starts_with("ph_"));
        assert!(result.authorization_url.ends_with(result.reference.as_str()));
    }

    #[tokio::test]
    async fn each_call_gets_a_fresh_reference() {
        let handler = InitializePaymentHandler::new(Arc::new(MockGateway::default()));

        let a = handler.handle(command("a@example.com", 100)).await.unwrap();
        let b = handler.handle(command("a@example.com", 100)).await.unwrap();

        assert_ne!(a.reference, b.reference);
    }

    #[tokio::test]
    async fn rejects_invalid_email() {
        let handler = InitializePaymentHandler::new(Arc::new(MockGateway::default()));

        let err = handler.handle(command("not-an-email", 100)).await.unwrap_err();
        assert_eq!(err.code, PaymentErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn rejects_zero_amount() {
        let handler = InitializePaymentHandler::new(Arc::new(MockGateway::default()));

        let err = handler.handle(command("a@example.com", 0)).await.unwrap_err();
        assert_eq!(err.code, PaymentErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn propagates_gateway_errors() {
        let gateway = MockGateway {
            fail_with: Some(PaymentError::network("connection reset")),
            ..MockGateway::default()
        };
        let handler = InitializePaymentHandler::new(Arc::new(gateway));

        let err = handler.handle(command("a@example.com", 100)).await.unwrap_err();
        assert!(err.retryable);
    }
}
