//! Adapters Layer
//!
//! Inbound adapters drive the application (HTTP API); outbound adapters
//! implement the domain ports against real services.

pub mod inbound;
pub mod outbound;
