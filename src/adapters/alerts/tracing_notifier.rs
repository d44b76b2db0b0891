//! Operator notifier that writes alerts to the log stream.
//!
//! Alerts are emitted at `error` level under the `payhook::alerts` target so
//! log-based alerting can route them separately from request traces.

use async_trait::async_trait;

use crate::ports::{OperatorAlert, OperatorNotifier};

#[derive(Debug, Default, Clone)]
pub struct TracingOperatorNotifier;

impl TracingOperatorNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OperatorNotifier for TracingOperatorNotifier {
    async fn notify(&self, alert: OperatorAlert) {
        tracing::error!(
            target: "payhook::alerts",
            code = alert.code,
            reference = %alert.reference,
            detail = %alert.detail,
            "Payment acknowledged but not applied"
        );
    }
}
