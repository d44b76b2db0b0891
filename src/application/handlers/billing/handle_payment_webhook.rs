//! HandlePaymentWebhookHandler - Command handler for inbound payment webhooks.
//!
//! The body is authenticated against the exact received bytes before any
//! parsing. Only then is it decoded, the reference claimed and the charge
//! applied. A claim is kept for every outcome the provider should not
//! redeliver and released for every outcome it should.

use std::sync::Arc;

use crate::domain::billing::{
    ChargeSucceeded, PaymentEvent, SubscriptionRecord, WebhookError, WebhookVerifier,
};
use crate::domain::foundation::{PaymentReference, Timestamp};
use crate::ports::{OperatorAlert, OperatorNotifier, ProcessedReferenceStore};

use super::{ApplyChargeSucceededCommand, ApplyChargeSucceededHandler};

/// Command to handle a payment webhook.
#[derive(Debug, Clone)]
pub struct HandlePaymentWebhookCommand {
    /// Raw request body, exactly as received.
    pub payload: Vec<u8>,
    /// Signature header value, if the header was present.
    pub signature: Option<String>,
    /// When the request arrived; stands in for a missing `paid_at`.
    pub received_at: Timestamp,
}

/// How an authenticated webhook was settled.
#[derive(Debug)]
pub enum WebhookOutcome {
    /// The charge moved the subscription forward.
    Applied(SubscriptionRecord),
    /// The reference was already claimed by an earlier delivery.
    Duplicate(PaymentReference),
    /// Event kind this service does not act on.
    Ignored { kind: String },
    /// Acknowledged without applying; an operator was alerted.
    Unapplied {
        reference: PaymentReference,
        reason: WebhookError,
    },
}

impl WebhookOutcome {
    /// Short machine-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            WebhookOutcome::Applied(_) => "applied",
            WebhookOutcome::Duplicate(_) => "duplicate",
            WebhookOutcome::Ignored { .. } => "ignored",
            WebhookOutcome::Unapplied { .. } => "unapplied",
        }
    }
}

/// Alert code raised when a claim could not be handed back after a
/// retryable failure.
const RELEASE_FAILED_ALERT: &str = "REFERENCE_RELEASE_FAILED";

/// Handler for the webhook pipeline.
pub struct HandlePaymentWebhookHandler {
    verifier: WebhookVerifier,
    settler: ClaimSettler,
}

impl HandlePaymentWebhookHandler {
    pub fn new(
        verifier: WebhookVerifier,
        references: Arc<dyn ProcessedReferenceStore>,
        apply: Arc<ApplyChargeSucceededHandler>,
        notifier: Arc<dyn OperatorNotifier>,
    ) -> Self {
        Self {
            verifier,
            settler: ClaimSettler {
                references,
                apply,
                notifier,
            },
        }
    }

    pub async fn handle(
        &self,
        cmd: HandlePaymentWebhookCommand,
    ) -> Result<WebhookOutcome, WebhookError> {
        // 1. Authenticate the raw bytes
        if !self.verifier.verify(&cmd.payload, cmd.signature.as_deref()) {
            tracing::warn!(
                signature_present = cmd.signature.is_some(),
                payload_len = cmd.payload.len(),
                "Rejected webhook with invalid signature"
            );
            return Err(WebhookError::SignatureInvalid);
        }

        // 2. Decode
        let event = PaymentEvent::parse(&cmd.payload).map_err(|e| {
            tracing::warn!(error = %e, "Rejected malformed webhook");
            WebhookError::from(e)
        })?;

        let charge = match event {
            PaymentEvent::ChargeSucceeded(charge) => charge,
            PaymentEvent::Other { kind } => {
                tracing::info!(kind = %kind, "Ignoring unhandled webhook event");
                return Ok(WebhookOutcome::Ignored { kind });
            }
        };

        // 3. Claim the reference
        let claimed = self
            .settler
            .references
            .claim(&charge.reference)
            .await
            .map_err(|e| WebhookError::Storage(e.to_string()))?;

        if !claimed {
            tracing::info!(reference = %charge.reference, "Duplicate webhook delivery");
            return Ok(WebhookOutcome::Duplicate(charge.reference));
        }

        // 4. Apply on its own task: a claimed reference is always settled,
        //    even when the caller stops waiting.
        let reference = charge.reference.clone();
        let received_at = cmd.received_at;
        let settler = self.settler.clone();
        let task = tokio::spawn(async move { settler.settle(charge, received_at).await });

        match task.await {
            Ok(result) => result,
            Err(join_err) => {
                let err = WebhookError::Storage(format!("application task failed: {}", join_err));
                tracing::error!(reference = %reference, error = %err, "Webhook application aborted");
                self.settler.release(&reference, &err).await;
                Err(err)
            }
        }
    }
}

/// Everything needed to finish a claimed reference, detached from the request.
#[derive(Clone)]
struct ClaimSettler {
    references: Arc<dyn ProcessedReferenceStore>,
    apply: Arc<ApplyChargeSucceededHandler>,
    notifier: Arc<dyn OperatorNotifier>,
}

impl ClaimSettler {
    async fn settle(
        &self,
        charge: ChargeSucceeded,
        received_at: Timestamp,
    ) -> Result<WebhookOutcome, WebhookError> {
        let reference = charge.reference.clone();
        let cmd = ApplyChargeSucceededCommand {
            payer_email: charge.payer_email,
            reference: charge.reference,
            paid_at: charge
                .paid_at
                .map(Timestamp::from_datetime)
                .unwrap_or(received_at),
        };

        let err = match self.apply.handle(cmd).await {
            Ok(record) => return Ok(WebhookOutcome::Applied(record)),
            Err(e) => WebhookError::from(e),
        };

        if !err.is_acknowledged() {
            tracing::error!(
                reference = %reference,
                error = %err,
                "Webhook application failed, releasing reference for redelivery"
            );
            self.release(&reference, &err).await;
            return Err(err);
        }

        tracing::warn!(reference = %reference, error = %err, "Webhook acknowledged without applying");

        if err.needs_operator_attention() {
            self.notifier
                .notify(OperatorAlert {
                    code: err.code(),
                    reference: reference.clone(),
                    detail: err.to_string(),
                })
                .await;
        }

        Ok(WebhookOutcome::Unapplied {
            reference,
            reason: err,
        })
    }

    /// Hands the claim back so the provider's redelivery can apply the event.
    ///
    /// A reference that stays claimed here would be acknowledged as a
    /// duplicate forever, so a failed release is escalated to an operator.
    async fn release(&self, reference: &PaymentReference, cause: &WebhookError) {
        if let Err(release_err) = self.references.release(reference).await {
            tracing::error!(
                reference = %reference,
                error = %release_err,
                "Failed to release payment reference"
            );
            self.notifier
                .notify(OperatorAlert {
                    code: RELEASE_FAILED_ALERT,
                    reference: reference.clone(),
                    detail: format!("{}; release failed: {}", cause, release_err),
                })
                .await;
        }
    }
}
