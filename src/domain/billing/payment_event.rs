//! Typed payment events parsed from verified webhook bodies.
//!
//! Parsing only ever runs on bytes that already passed signature
//! verification. Unknown event kinds are not errors: they parse to
//! [`PaymentEvent::Other`] so new provider events are acknowledged.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::foundation::PaymentReference;

/// Discriminator value of a successful charge.
pub const CHARGE_SUCCESS: &str = "charge.success";

/// Errors raised while turning webhook bytes into a [`PaymentEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Body is not a JSON object or has no usable discriminator.
    #[error("Malformed event: {0}")]
    Malformed(String),

    /// A field required by a known event kind is absent or empty.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// `paid_at` is present but not an RFC 3339 timestamp.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// A successful charge reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeSucceeded {
    /// Provider-assigned transaction reference.
    pub reference: PaymentReference,
    /// Email of the paying customer, used to resolve the user.
    pub payer_email: String,
    /// When the provider settled the charge, if reported.
    pub paid_at: Option<DateTime<Utc>>,
}

/// Event kinds the billing pipeline distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentEvent {
    ChargeSucceeded(ChargeSucceeded),
    Other { kind: String },
}

impl PaymentEvent {
    /// Parses a verified webhook body.
    ///
    /// # Errors
    ///
    /// - `Malformed` when the body is not a JSON object with a string `event`
    /// - `MissingField` when a `charge.success` event lacks its reference or
    ///   payer email
    /// - `InvalidTimestamp` when `paid_at` is present but unparsable
    pub fn parse(payload: &[u8]) -> Result<Self, ParseError> {
        let value: Value = serde_json::from_slice(payload)
            .map_err(|e| ParseError::Malformed(e.to_string()))?;

        let root = value
            .as_object()
            .ok_or_else(|| ParseError::Malformed("body is not a JSON object".to_string()))?;

        let kind = root
            .get("event")
            .and_then(Value::as_str)
            .ok_or_else(|| ParseError::Malformed("missing event discriminator".to_string()))?;

        if kind != CHARGE_SUCCESS {
            return Ok(PaymentEvent::Other {
                kind: kind.to_string(),
            });
        }

        let data = root
            .get("data")
            .and_then(Value::as_object)
            .ok_or(ParseError::MissingField("data"))?;

        Ok(PaymentEvent::ChargeSucceeded(parse_charge(data)?))
    }

    /// Returns the provider's name for this event kind.
    pub fn kind(&self) -> &str {
        match self {
            PaymentEvent::ChargeSucceeded(_) => CHARGE_SUCCESS,
            PaymentEvent::Other { kind } => kind,
        }
    }
}

fn parse_charge(data: &Map<String, Value>) -> Result<ChargeSucceeded, ParseError> {
    let reference = data
        .get("reference")
        .and_then(Value::as_str)
        .and_then(|r| PaymentReference::new(r).ok())
        .ok_or(ParseError::MissingField("data.reference"))?;

    let payer_email = data
        .get("customer")
        .and_then(|c| c.get("email"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or(ParseError::MissingField("data.customer.email"))?
        .to_string();

    let paid_at = match data.get("paid_at").or_else(|| data.get("paidAt")) {
        None | Some(Value::Null) => None,
        Some(Value::String(raw)) => Some(
            DateTime::parse_from_rfc3339(raw)
                .map_err(|_| ParseError::InvalidTimestamp(raw.clone()))?
                .with_timezone(&Utc),
        ),
        Some(other) => return Err(ParseError::InvalidTimestamp(other.to_string())),
    };

    Ok(ChargeSucceeded {
        reference,
        payer_email,
        paid_at,
    })
}
