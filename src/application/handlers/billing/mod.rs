//! Billing handlers.
//!
//! ## Commands
//! - Processing payment webhooks
//! - Applying a confirmed charge to a subscription
//! - Initialising a payment with the provider

mod apply_charge_succeeded;
mod handle_payment_webhook;
mod initialize_payment;
mod keyed_locks;

pub use apply_charge_succeeded::{
    ApplyChargeSettings, ApplyChargeSucceededCommand, ApplyChargeSucceededHandler,
};
pub use handle_payment_webhook::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, WebhookOutcome,
};
pub use initialize_payment::{InitializePaymentCommand, InitializePaymentHandler};
pub use keyed_locks::KeyedLocks;
