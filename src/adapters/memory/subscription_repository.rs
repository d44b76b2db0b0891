//! In-memory subscription repository.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::billing::SubscriptionRecord;
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::SubscriptionRepository;

/// Subscription records keyed by user id.
#[derive(Debug, Default)]
pub struct InMemorySubscriptionRepository {
    records: RwLock<HashMap<String, SubscriptionRecord>>,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<SubscriptionRecord>, DomainError> {
        Ok(self.records.read().await.get(user_id.as_str()).cloned())
    }

    async fn save(&self, record: &SubscriptionRecord) -> Result<(), DomainError> {
        self.records
            .write()
            .await
            .insert(record.user_id.as_str().to_string(), record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::PaymentReference;
    use chrono::NaiveDate;

    fn record(user: &str, reference: &str) -> SubscriptionRecord {
        SubscriptionRecord {
            user_id: UserId::new(user).unwrap(),
            is_premium: true,
            subscription_start: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            subscription_end: NaiveDate::from_ymd_opt(2024, 4, 10).unwrap(),
            last_payment_reference: Some(PaymentReference::new(reference).unwrap()),
        }
    }

    #[tokio::test]
    async fn save_then_find() {
        let repo = InMemorySubscriptionRepository::new();
        let saved = record("u-1", "ref-1");

        repo.save(&saved).await.unwrap();

        let found = repo.find_by_user(&saved.user_id).await.unwrap();
        assert_eq!(found, Some(saved));
    }

    #[tokio::test]
    async fn save_replaces_whole_record() {
        let repo = InMemorySubscriptionRepository::new();
        repo.save(&record("u-1", "ref-1")).await.unwrap();
        repo.save(&record("u-1", "ref-2")).await.unwrap();

        let found = repo
            .find_by_user(&UserId::new("u-1").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.last_payment_reference.unwrap().as_str(), "ref-2");
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn missing_user_is_none() {
        let repo = InMemorySubscriptionRepository::new();
        let found = repo.find_by_user(&UserId::new("nobody").unwrap()).await.unwrap();
        assert!(found.is_none());
    }
}
