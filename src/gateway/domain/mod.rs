//! Values exchanged with the gateway.

mod headers;
mod request;
mod response;

pub use headers::{HOP_BY_HOP_HEADERS, is_hop_by_hop, strip_hop_by_hop};
pub use request::ProxyRequest;
pub use response::{BroadcastOutcome, ProxyResponse, ResponseBody};
