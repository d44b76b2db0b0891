//! Billing domain module.
//!
//! Turns signed payment webhooks into subscription changes.
//!
//! # Module Structure
//!
//! - `webhook_verifier` - HMAC-SHA512 signature check over raw bytes
//! - `payment_event` - Typed events parsed from verified bytes
//! - `subscription` - Subscription record, state machine and renewal policy
//! - `webhook_errors` - Error taxonomy with HTTP mapping

mod payment_event;
mod subscription;
mod webhook_errors;
mod webhook_verifier;

pub use payment_event::{ChargeSucceeded, ParseError, PaymentEvent, CHARGE_SUCCESS};
pub use subscription::{
    RenewalPolicy, SubscriptionError, SubscriptionRecord, SubscriptionState, RENEWAL_POLICY,
    SUBSCRIPTION_PERIOD_MONTHS,
};
pub use webhook_errors::{ApplyError, WebhookError};
pub use webhook_verifier::{sign_payload, verify_signature, WebhookVerifier};
