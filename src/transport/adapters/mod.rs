//! Adapter implementations for the outbound transport port.

pub mod http;
pub mod memory;

pub use http::HttpServiceTransport;
pub use memory::{InMemoryServiceTransport, ScriptedReply};
