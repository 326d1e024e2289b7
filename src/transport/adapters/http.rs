//! `reqwest`-backed transport adapter.

use crate::transport::{
    OutboundRequest, OutboundResponse, ServiceTransport, TransportError, TransportResult,
};
use async_trait::async_trait;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends outbound calls over HTTP with a shared connection pool.
///
/// The client has no overall timeout of its own; per-call deadlines are
/// applied by the caller through [`crate::transport::send_with_deadline`].
#[derive(Debug, Clone)]
pub struct HttpServiceTransport {
    client: reqwest::Client,
}

impl HttpServiceTransport {
    /// Creates an adapter with a default client.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Unavailable`] when the TLS backend or
    /// resolver cannot be initialised.
    pub fn new() -> TransportResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|err| TransportError::Unavailable(err.to_string()))?;
        Ok(Self { client })
    }

    /// Creates an adapter around an existing client.
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn classify(url: &str, err: &reqwest::Error) -> TransportError {
    if err.is_connect() {
        TransportError::Connect {
            url: url.to_owned(),
            message: err.to_string(),
        }
    } else {
        TransportError::Request {
            url: url.to_owned(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl ServiceTransport for HttpServiceTransport {
    async fn send(&self, request: OutboundRequest) -> TransportResult<OutboundResponse> {
        let url = request.url().to_string();
        let mut builder = self
            .client
            .request(request.method().clone(), request.url().clone());
        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|err| classify(&url, &err))?;

        let status = response.status().as_u16();
        let mut outbound = OutboundResponse::new(status);
        for (name, value) in response.headers() {
            if let Ok(text) = value.to_str() {
                outbound = outbound.with_header(name.as_str(), text);
            }
        }
        let body = response.bytes().await.map_err(|err| classify(&url, &err))?;
        Ok(outbound.with_body(body.to_vec()))
    }
}
