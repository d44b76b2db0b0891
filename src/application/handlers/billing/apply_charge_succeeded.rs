//! ApplyChargeSucceededHandler - Moves a user's subscription forward after a
//! confirmed charge.
//!
//! Steps, in order:
//! 1. Optionally re-verify the charge with the provider
//! 2. Resolve the payer email to a user
//! 3. Under the user's lock, read the record, compute the new window and
//!    write the whole record back

use std::sync::Arc;
use std::time::Duration;

use crate::domain::billing::{ApplyError, RenewalPolicy, SubscriptionRecord, RENEWAL_POLICY};
use crate::domain::foundation::{PaymentReference, Timestamp, UserId};
use crate::ports::{PaymentGateway, SubscriptionRepository, TransactionVerification, UserDirectory};

use super::KeyedLocks;

/// Command to apply a successful charge.
#[derive(Debug, Clone)]
pub struct ApplyChargeSucceededCommand {
    pub payer_email: String,
    pub reference: PaymentReference,
    pub paid_at: Timestamp,
}

/// Tunables for charge application.
#[derive(Debug, Clone)]
pub struct ApplyChargeSettings {
    /// Confirm each charge with the provider before applying it.
    pub verify_with_provider: bool,

    /// Budget for the user directory lookup.
    pub directory_timeout: Duration,

    /// Budget for the whole provider verification, retries included.
    pub provider_timeout: Duration,

    pub renewal_policy: RenewalPolicy,
}

impl Default for ApplyChargeSettings {
    fn default() -> Self {
        Self {
            verify_with_provider: false,
            directory_timeout: Duration::from_secs(5),
            provider_timeout: Duration::from_secs(11),
            renewal_policy: RENEWAL_POLICY,
        }
    }
}

/// Handler for the subscription state machine's single transition.
pub struct ApplyChargeSucceededHandler {
    directory: Arc<dyn UserDirectory>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    gateway: Arc<dyn PaymentGateway>,
    locks: KeyedLocks,
    settings: ApplyChargeSettings,
}

impl ApplyChargeSucceededHandler {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        gateway: Arc<dyn PaymentGateway>,
        settings: ApplyChargeSettings,
    ) -> Self {
        Self {
            directory,
            subscriptions,
            gateway,
            locks: KeyedLocks::new(),
            settings,
        }
    }

    pub async fn handle(
        &self,
        cmd: ApplyChargeSucceededCommand,
    ) -> Result<SubscriptionRecord, ApplyError> {
        if self.settings.verify_with_provider {
            self.reverify(&cmd.reference).await?;
        }

        let user_id = self.resolve_user(&cmd.payer_email).await?;

        let _guard = self.locks.lock(user_id.as_str()).await;

        let current = self
            .subscriptions
            .find_by_user(&user_id)
            .await
            .map_err(|e| ApplyError::RecordWriteFailed(e.to_string()))?;

        let updated = SubscriptionRecord::apply_charge(
            current.as_ref(),
            user_id.clone(),
            cmd.reference.clone(),
            cmd.paid_at,
            self.settings.renewal_policy,
        )
        .map_err(|e| ApplyError::RecordWriteFailed(e.to_string()))?;

        if current.as_ref() == Some(&updated) {
            tracing::debug!(
                user_id = %user_id,
                reference = %cmd.reference,
                "Charge already reflected in subscription record"
            );
            return Ok(updated);
        }

        self.subscriptions
            .save(&updated)
            .await
            .map_err(|e| ApplyError::RecordWriteFailed(e.to_string()))?;

        tracing::info!(
            user_id = %user_id,
            reference = %cmd.reference,
            subscription_start = %updated.subscription_start,
            subscription_end = %updated.subscription_end,
            "Subscription activated"
        );

        Ok(updated)
    }

    async fn reverify(&self, reference: &PaymentReference) -> Result<(), ApplyError> {
        let verification = tokio::time::timeout(
            self.settings.provider_timeout,
            self.gateway.verify_transaction(reference),
        )
        .await
        .unwrap_or_else(|_| TransactionVerification::Unreachable {
            reason: format!("timed out after {:?}", self.settings.provider_timeout),
        });

        match verification {
            TransactionVerification::Success => Ok(()),
            TransactionVerification::NotSuccess { status } => {
                tracing::warn!(
                    reference = %reference,
                    provider_status = %status,
                    "Provider does not confirm charge"
                );
                Err(ApplyError::ProviderRejected(reference.clone()))
            }
            TransactionVerification::Unreachable { reason } => {
                Err(ApplyError::ProviderUnreachable(reason))
            }
        }
    }

    async fn resolve_user(&self, email: &str) -> Result<UserId, ApplyError> {
        let lookup = tokio::time::timeout(
            self.settings.directory_timeout,
            self.directory.find_by_email(email),
        )
        .await
        .map_err(|_| {
            ApplyError::DirectoryUnavailable(format!(
                "timed out after {:?}",
                self.settings.directory_timeout
            ))
        })?;

        lookup
            .map_err(|e| ApplyError::DirectoryUnavailable(e.to_string()))?
            .ok_or_else(|| ApplyError::UserNotFound(email.to_string()))
    }
}
