//! Outbound calls from the control plane to registered services.
//!
//! The health monitor and the gateway both talk to services through the
//! [`ServiceTransport`] port. Every call is bounded by
//! [`send_with_deadline`]; there are no retries at this layer.
//!
//! - Request/response values in [`OutboundRequest`] and [`OutboundResponse`]
//! - The port contract in [`ServiceTransport`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
mod deadline;
mod message;
mod port;

pub use deadline::{DeadlineElapsed, send_with_deadline, with_deadline};
pub use message::{OutboundRequest, OutboundResponse};
#[cfg(test)]
pub use port::MockServiceTransport;
pub use port::{ServiceTransport, TransportError, TransportResult};
