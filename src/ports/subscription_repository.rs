//! Subscription repository port.
//!
//! Defines the contract for persisting per-user subscription records.
//!
//! # Design
//!
//! - **One per user**: records are keyed by user id
//! - **Whole-record writes**: `save` replaces every field at once, so a
//!   reader never observes a half-applied payment

use async_trait::async_trait;

use crate::domain::billing::SubscriptionRecord;
use crate::domain::foundation::{DomainError, UserId};

/// Repository port for subscription record persistence.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Find the record owned by `user_id`.
    ///
    /// Returns `None` if the user never had a subscription.
    async fn find_by_user(&self, user_id: &UserId)
        -> Result<Option<SubscriptionRecord>, DomainError>;

    /// Insert or replace the record for its user.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save(&self, record: &SubscriptionRecord) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn SubscriptionRepository) {}
    }
}
