//! PostgreSQL implementation of SubscriptionRepository.
//!
//! One row per user in `subscriptions`; writes are a single upsert so the
//! record is replaced whole.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::billing::SubscriptionRecord;
use crate::domain::foundation::{DomainError, ErrorCode, PaymentReference, UserId};
use crate::ports::SubscriptionRepository;

/// PostgreSQL implementation of the SubscriptionRepository port.
pub struct PostgresSubscriptionRepository {
    pool: PgPool,
}

impl PostgresSubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a subscription.
#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    user_id: Uuid,
    is_premium: bool,
    subscription_start: NaiveDate,
    subscription_end: NaiveDate,
    last_payment_reference: Option<String>,
}

impl TryFrom<SubscriptionRow> for SubscriptionRecord {
    type Error = DomainError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        let last_payment_reference = row
            .last_payment_reference
            .map(PaymentReference::new)
            .transpose()
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Invalid last_payment_reference: {}", e),
                )
            })?;

        Ok(SubscriptionRecord {
            user_id: UserId::from_uuid(row.user_id),
            is_premium: row.is_premium,
            subscription_start: row.subscription_start,
            subscription_end: row.subscription_end,
            last_payment_reference,
        })
    }
}

fn parse_user_id_as_uuid(user_id: &UserId) -> Result<Uuid, DomainError> {
    Uuid::parse_str(user_id.as_str()).map_err(|e| {
        DomainError::new(
            ErrorCode::ValidationFailed,
            format!("User ID must be a valid UUID: {}", e),
        )
    })
}

#[async_trait]
impl SubscriptionRepository for PostgresSubscriptionRepository {
    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<SubscriptionRecord>, DomainError> {
        let user_uuid = parse_user_id_as_uuid(user_id)?;

        let row: Option<SubscriptionRow> = sqlx::query_as(
            r#"
            SELECT user_id, is_premium, subscription_start, subscription_end,
                   last_payment_reference
            FROM subscriptions
            WHERE user_id = $1
            "#,
        )
        .bind(user_uuid)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to load subscription: {}", e)))?;

        row.map(SubscriptionRecord::try_from).transpose()
    }

    async fn save(&self, record: &SubscriptionRecord) -> Result<(), DomainError> {
        let user_uuid = parse_user_id_as_uuid(&record.user_id)?;

        sqlx::query(
            r#"
            INSERT INTO subscriptions (
                user_id, is_premium, subscription_start, subscription_end,
                last_payment_reference, updated_at
            ) VALUES ($1, $2, $3, $4, $5, NOW())
            ON CONFLICT (user_id) DO UPDATE SET
                is_premium = EXCLUDED.is_premium,
                subscription_start = EXCLUDED.subscription_start,
                subscription_end = EXCLUDED.subscription_end,
                last_payment_reference = EXCLUDED.last_payment_reference,
                updated_at = NOW()
            "#,
        )
        .bind(user_uuid)
        .bind(record.is_premium)
        .bind(record.subscription_start)
        .bind(record.subscription_end)
        .bind(record.last_payment_reference.as_ref().map(|r| r.as_str()))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to save subscription: {}", e)))?;

        Ok(())
    }
}
