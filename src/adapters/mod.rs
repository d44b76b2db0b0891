//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - Axum routers and handlers
//! - `postgres` - Durable stores over sqlx
//! - `memory` - In-process stores for tests and local runs
//! - `provider` - Payment provider REST client
//! - `alerts` - Operator alert channels

pub mod alerts;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod provider;
