//! In-memory adapters for tests and local development.
//!
//! State is lost on restart, so the processed reference set here does not
//! protect against redelivery across deploys.

mod processed_reference_store;
mod subscription_repository;
mod user_directory;

pub use processed_reference_store::InMemoryProcessedReferenceStore;
pub use subscription_repository::InMemorySubscriptionRepository;
pub use user_directory::InMemoryUserDirectory;
