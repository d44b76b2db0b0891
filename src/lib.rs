//! payhook - Payment webhook receiver
//!
//! Authenticates payment provider notifications against the exact bytes
//! received, applies each successful charge at most once to a per-user
//! subscription record, and exposes an endpoint to start new payments.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
