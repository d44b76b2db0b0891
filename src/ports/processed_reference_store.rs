//! ProcessedReferenceStore port - Idempotency guard for payment references.
//!
//! The provider redelivers a webhook whenever it does not see a prompt 2xx,
//! and may deliver the same event on several connections at once. Each
//! reference must change a subscription at most once.
//!
//! ## Contract
//!
//! `claim` is a single atomic check-and-insert. Exactly one caller among any
//! number of concurrent claims for the same reference receives `true`.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PaymentReference};

/// Port for tracking which payment references have been applied.
///
/// Implementations must back the set with storage that survives a restart
/// in production, so redeliveries after a deploy are still recognised.
#[async_trait]
pub trait ProcessedReferenceStore: Send + Sync {
    /// Records the reference if unseen.
    ///
    /// Returns `true` if this call recorded it, `false` if it was already
    /// present.
    async fn claim(&self, reference: &PaymentReference) -> Result<bool, DomainError>;

    /// Removes a claim so a redelivery can apply the event.
    ///
    /// Only used when application failed in a retryable way after the
    /// claim succeeded.
    async fn release(&self, reference: &PaymentReference) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processed_reference_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn ProcessedReferenceStore) {}
    }
}
