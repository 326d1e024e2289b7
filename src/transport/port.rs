//! Outbound transport port.

use super::{OutboundRequest, OutboundResponse};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Result type for outbound transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Sends requests to registered services.
///
/// Adapters are not required to enforce deadlines themselves; callers wrap
/// every call with [`super::send_with_deadline`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceTransport: Send + Sync {
    /// Sends one request and returns the raw response.
    ///
    /// Any HTTP status, including 4xx and 5xx, is a successful transport
    /// outcome.
    async fn send(&self, request: OutboundRequest) -> TransportResult<OutboundResponse>;
}

/// Errors returned by outbound transport adapters.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The call did not settle before its deadline.
    #[error("request to {url} timed out after {after:?}")]
    Timeout {
        /// Destination URL.
        url: String,
        /// Deadline that elapsed.
        after: Duration,
    },

    /// No connection could be established.
    #[error("connection to {url} failed: {message}")]
    Connect {
        /// Destination URL.
        url: String,
        /// Underlying failure message.
        message: String,
    },

    /// The request failed after the connection was made.
    #[error("request to {url} failed: {message}")]
    Request {
        /// Destination URL.
        url: String,
        /// Underlying failure message.
        message: String,
    },

    /// The transport adapter itself could not be used.
    #[error("transport unavailable: {0}")]
    Unavailable(String),
}

impl TransportError {
    /// Returns whether this error is a deadline expiry.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
