//! Operator notifier port - Alert channel for acknowledged-but-unapplied events.
//!
//! Some webhook outcomes are answered with 200 so the provider stops
//! redelivering, yet still need a human: a payment from an unknown email, or
//! a body the provider itself disowns.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::foundation::PaymentReference;

/// Something an operator should look at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperatorAlert {
    /// Machine-readable reason, e.g. `USER_NOT_FOUND`.
    pub code: &'static str,

    /// Reference of the affected payment.
    pub reference: PaymentReference,

    /// Human-readable detail.
    pub detail: String,
}

/// Port for raising operator alerts.
///
/// Delivery is best effort; a failing channel must not fail the webhook.
#[async_trait]
pub trait OperatorNotifier: Send + Sync {
    async fn notify(&self, alert: OperatorAlert);
}
