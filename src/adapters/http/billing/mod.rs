//! HTTP adapter for billing endpoints.
//!
//! - `POST /api/webhooks/payments` - Handle payment provider webhooks
//! - `POST /api/payments/initialize` - Start a checkout
//! - `GET /health` - Liveness probe

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{BillingApiError, BillingAppState, DEFAULT_SIGNATURE_HEADER};
pub use routes::{app_router, billing_router, payment_routes, webhook_routes};
