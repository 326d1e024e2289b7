//! Logical proxy requests addressed to a registered service.

use crate::directory::domain::ServiceId;
use reqwest::Method;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

/// A call to make on behalf of a caller: "call service X at path P".
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyRequest {
    /// Target service.
    pub service_id: ServiceId,
    /// HTTP method.
    pub method: Method,
    /// Path appended to the service's base URL.
    pub path: String,
    /// Headers forwarded verbatim.
    pub headers: BTreeMap<String, String>,
    /// Query parameters, percent-encoded onto the destination URL.
    pub query: BTreeMap<String, String>,
    /// Optional JSON body.
    pub body: Option<Value>,
    /// Per-call deadline; the gateway default applies when absent.
    pub timeout: Option<Duration>,
}

impl ProxyRequest {
    /// Creates a request with no headers, query, body, or custom deadline.
    #[must_use]
    pub fn new(service_id: ServiceId, method: Method, path: impl Into<String>) -> Self {
        Self {
            service_id,
            method,
            path: path.into(),
            headers: BTreeMap::new(),
            query: BTreeMap::new(),
            body: None,
            timeout: None,
        }
    }

    /// Creates a `GET` request.
    #[must_use]
    pub fn get(service_id: ServiceId, path: impl Into<String>) -> Self {
        Self::new(service_id, Method::GET, path)
    }

    /// Creates a `POST` request carrying a JSON body.
    #[must_use]
    pub fn post(service_id: ServiceId, path: impl Into<String>, body: Value) -> Self {
        Self::new(service_id, Method::POST, path).with_body(body)
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Overrides the gateway's default deadline for this call.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
