//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod billing;

pub use billing::{
    ApplyChargeSettings, ApplyChargeSucceededCommand, ApplyChargeSucceededHandler,
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, InitializePaymentCommand,
    InitializePaymentHandler, KeyedLocks, WebhookOutcome,
};
