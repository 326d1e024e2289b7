//! Deadline enforcement for outbound calls.

use super::{OutboundRequest, OutboundResponse, ServiceTransport, TransportError, TransportResult};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// The wrapped future did not complete before its deadline.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("deadline of {after:?} elapsed")]
pub struct DeadlineElapsed {
    /// Deadline that elapsed.
    pub after: Duration,
}

/// Runs `call` to completion or aborts it once `deadline` elapses.
///
/// Dropping the future on expiry cancels the underlying I/O.
///
/// # Errors
///
/// Returns [`DeadlineElapsed`] when the deadline passes first.
pub async fn with_deadline<F>(deadline: Duration, call: F) -> Result<F::Output, DeadlineElapsed>
where
    F: Future,
{
    tokio::time::timeout(deadline, call)
        .await
        .map_err(|_| DeadlineElapsed { after: deadline })
}

/// Sends a request through `transport`, bounded by `deadline`.
///
/// # Errors
///
/// Returns [`TransportError::Timeout`] when the deadline elapses, or the
/// adapter's own error.
pub async fn send_with_deadline<T>(
    transport: &T,
    request: OutboundRequest,
    deadline: Duration,
) -> TransportResult<OutboundResponse>
where
    T: ServiceTransport + ?Sized,
{
    let url = request.url().to_string();
    with_deadline(deadline, transport.send(request))
        .await
        .map_err(|elapsed| TransportError::Timeout {
            url,
            after: elapsed.after,
        })?
}
