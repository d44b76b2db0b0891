//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresSubscriptionRepository` - Per-user subscription records
//! - `PostgresProcessedReferenceStore` - Durable idempotency set
//! - `PostgresUserDirectory` - Email lookup over `users`
//!
//! Schema lives in `migrations/` and is applied with [`MIGRATOR`].

mod processed_reference_store;
mod subscription_repository;
mod user_directory;

pub use processed_reference_store::PostgresProcessedReferenceStore;
pub use subscription_repository::PostgresSubscriptionRepository;
pub use user_directory::PostgresUserDirectory;

/// Embedded schema migrations.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
