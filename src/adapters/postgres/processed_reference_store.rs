//! PostgreSQL implementation of ProcessedReferenceStore.
//!
//! The primary key on `processed_payment_references.reference` makes the
//! claim atomic across processes: `ON CONFLICT DO NOTHING` inserts for
//! exactly one caller.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, PaymentReference};
use crate::ports::ProcessedReferenceStore;

pub struct PostgresProcessedReferenceStore {
    pool: PgPool,
}

impl PostgresProcessedReferenceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProcessedReferenceStore for PostgresProcessedReferenceStore {
    async fn claim(&self, reference: &PaymentReference) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO processed_payment_references (reference, claimed_at)
            VALUES ($1, NOW())
            ON CONFLICT (reference) DO NOTHING
            "#,
        )
        .bind(reference.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to claim reference: {}", e)))?;

        Ok(result.rows_affected() == 1)
    }

    async fn release(&self, reference: &PaymentReference) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM processed_payment_references WHERE reference = $1")
            .bind(reference.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to release reference: {}", e)))?;

        Ok(())
    }
}
