//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Webhook Ports
//!
//! - `ProcessedReferenceStore` - Payment reference idempotency tracking
//! - `OperatorNotifier` - Alerts for acknowledged events that were not applied
//!
//! ## Persistence Ports
//!
//! - `UserDirectory` - Email to user lookup
//! - `SubscriptionRepository` - Per-user subscription records
//!
//! ## Provider Ports
//!
//! - `PaymentGateway` - Transaction verification and initialisation

mod operator_notifier;
mod payment_gateway;
mod processed_reference_store;
mod subscription_repository;
mod user_directory;

pub use operator_notifier::{OperatorAlert, OperatorNotifier};
pub use payment_gateway::{
    InitializeTransactionRequest, PaymentError, PaymentErrorCode, PaymentGateway,
    PaymentInitialization, TransactionVerification,
};
pub use processed_reference_store::ProcessedReferenceStore;
pub use subscription_repository::SubscriptionRepository;
pub use user_directory::UserDirectory;
