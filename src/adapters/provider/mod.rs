//! Payment provider adapters.
//!
//! - `HttpPaymentGateway` - REST client used for re-verification and
//!   payment initialisation

mod http_gateway;
mod wire_types;

pub use http_gateway::{HttpGatewayConfig, HttpPaymentGateway, DEFAULT_BASE_URL};
