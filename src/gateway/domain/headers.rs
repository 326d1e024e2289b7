//! Header rules applied before a request leaves the gateway.

use std::collections::BTreeMap;

/// Connection-scoped headers that never travel past the gateway.
pub const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Returns whether a header name is hop-by-hop, ignoring ASCII case.
#[must_use]
pub fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP_HEADERS
        .iter()
        .any(|hop| hop.eq_ignore_ascii_case(name.trim()))
}

/// Remove hop-by-hop headers that must not be forwarded.
pub fn strip_hop_by_hop(headers: &mut BTreeMap<String, String>) {
    headers.retain(|name, _| !is_hop_by_hop(name));
}
