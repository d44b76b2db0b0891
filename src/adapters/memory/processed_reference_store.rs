//! In-memory processed reference store.
//!
//! Claims live only as long as the process. Suitable for tests and local
//! development; production wiring uses the PostgreSQL store.

use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::Mutex;

use crate::domain::foundation::{DomainError, PaymentReference};
use crate::ports::ProcessedReferenceStore;

/// Processed reference set backed by a `HashSet` under a mutex.
#[derive(Debug, Default)]
pub struct InMemoryProcessedReferenceStore {
    claimed: Mutex<HashSet<String>>,
}

impl InMemoryProcessedReferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of claimed references.
    pub async fn len(&self) -> usize {
        self.claimed.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.claimed.lock().await.is_empty()
    }

    /// Returns `true` if the reference is currently claimed.
    pub async fn is_claimed(&self, reference: &PaymentReference) -> bool {
        self.claimed.lock().await.contains(reference.as_str())
    }
}

#[async_trait]
impl ProcessedReferenceStore for InMemoryProcessedReferenceStore {
    async fn claim(&self, reference: &PaymentReference) -> Result<bool, DomainError> {
        Ok(self
            .claimed
            .lock()
            .await
            .insert(reference.as_str().to_string()))
    }

    async fn release(&self, reference: &PaymentReference) -> Result<(), DomainError> {
        self.claimed.lock().await.remove(reference.as_str());
        Ok(())
    }
}
