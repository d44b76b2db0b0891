//! Subscription record and the charge-succeeded transition.
//!
//! Each user owns at most one `SubscriptionRecord`. A successful charge
//! moves the record from `NoSubscription` to `Active` (or keeps it
//! `Active`) and sets a one-calendar-month validity window.
//!
//! # Invariants
//!
//! - `subscription_end == subscription_start + 1 calendar month`, clamped to
//!   the last day of the target month
//! - Applying the charge recorded in `last_payment_reference` again is a no-op

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::{
    add_calendar_months, PaymentReference, StateMachine, Timestamp, UserId,
};

/// Length of the window bought by one successful charge.
pub const SUBSCRIPTION_PERIOD_MONTHS: u32 = 1;

/// How a payment on an already active subscription moves the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenewalPolicy {
    /// The window restarts at the payment date.
    ResetFromPayment,
    /// The new window starts where the current one ends, if that is later
    /// than the payment date.
    ExtendFromCurrentEnd,
}

/// Renewal policy applied to repeat payments.
pub const RENEWAL_POLICY: RenewalPolicy = RenewalPolicy::ResetFromPayment;

/// Lifecycle state of a user's subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionState {
    NoSubscription,
    Active,
}

impl StateMachine for SubscriptionState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SubscriptionState::*;
        matches!(
            (self, target),
            (NoSubscription, Active) | (Active, Active)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        vec![SubscriptionState::Active]
    }
}

/// Errors raised by subscription transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscriptionError {
    #[error("Subscription window out of range starting {0}")]
    DateOutOfRange(NaiveDate),

    #[error("Invalid state transition: {0}")]
    InvalidTransition(String),
}

/// Per-user subscription record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    pub user_id: UserId,
    pub is_premium: bool,
    pub subscription_start: NaiveDate,
    pub subscription_end: NaiveDate,
    pub last_payment_reference: Option<PaymentReference>,
}

impl SubscriptionRecord {
    /// Current lifecycle state.
    pub fn state(&self) -> SubscriptionState {
        if self.is_premium {
            SubscriptionState::Active
        } else {
            SubscriptionState::NoSubscription
        }
    }

    /// Applies a successful charge to `current` and returns the new record.
    ///
    /// `current` is `None` when the user has never had a record. The
    /// result always satisfies the one-month window invariant.
    pub fn apply_charge(
        current: Option<&SubscriptionRecord>,
        user_id: UserId,
        reference: PaymentReference,
        paid_at: Timestamp,
        policy: RenewalPolicy,
    ) -> Result<SubscriptionRecord, SubscriptionError> {
        if let Some(record) = current {
            if record.last_payment_reference.as_ref() == Some(&reference) {
                return Ok(record.clone());
            }
        }

        let state = current
            .map(SubscriptionRecord::state)
            .unwrap_or(SubscriptionState::NoSubscription);
        state
            .transition_to(SubscriptionState::Active)
            .map_err(|e| SubscriptionError::InvalidTransition(e.to_string()))?;

        let paid_on = paid_at.date();
        let start = match (policy, current) {
            (RenewalPolicy::ExtendFromCurrentEnd, Some(record))
                if record.is_premium && record.subscription_end > paid_on =>
            {
                record.subscription_end
            }
            _ => paid_on,
        };

        let end = add_calendar_months(start, SUBSCRIPTION_PERIOD_MONTHS)
            .ok_or(SubscriptionError::DateOutOfRange(start))?;

        Ok(SubscriptionRecord {
            user_id,
            is_premium: true,
            subscription_start: start,
            subscription_end: end,
            last_payment_reference: Some(reference),
        })
    }
}
