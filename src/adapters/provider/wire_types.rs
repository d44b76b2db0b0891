//! Provider REST payloads.
//!
//! Every response is wrapped in an envelope `{ "status": bool, "message":
//! string, "data": ... }`. Only the fields this service reads are modelled.

use serde::{Deserialize, Serialize};

/// Response envelope shared by all endpoints.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub status: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

/// `data` of `GET /transaction/verify/{reference}`.
#[derive(Debug, Deserialize)]
pub struct VerifiedTransaction {
    /// `success`, `failed`, `abandoned`, `ongoing`, ...
    pub status: String,
    #[serde(default)]
    pub reference: Option<String>,
}

/// Body of `POST /transaction/initialize`.
#[derive(Debug, Serialize)]
pub struct InitializeBody<'a> {
    pub email: &'a str,
    /// Minor units, sent as a string.
    pub amount: String,
    pub reference: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<&'a str>,
}

/// `data` of `POST /transaction/initialize`.
#[derive(Debug, Deserialize)]
pub struct InitializedTransaction {
    pub authorization_url: String,
    #[serde(default)]
    pub access_code: Option<String>,
    pub reference: String,
}

/// Provider status string for a settled charge.
pub const SUCCESS_STATUS: &str = "success";
