//! Classification of active health probe outcomes.

use crate::directory::domain::ServiceStatus;
use crate::transport::{OutboundResponse, TransportError};
use serde_json::{Value, json};

/// Maps a probe outcome to a status and a diagnostic payload.
///
/// | Outcome                      | Status      | Details                      |
/// |------------------------------|-------------|------------------------------|
/// | 2xx                          | `healthy`   | parsed JSON body, if any     |
/// | 500 and above                | `unhealthy` | `{"statusCode": n}`          |
/// | any other status             | `degraded`  | `{"statusCode": n}`          |
/// | timeout or transport failure | `unhealthy` | `{"error": message}`         |
#[must_use]
pub fn classify_probe(
    outcome: &Result<OutboundResponse, TransportError>,
) -> (ServiceStatus, Value) {
    match outcome {
        Ok(response) if response.is_success() => {
            let details = serde_json::from_slice::<Value>(response.body())
                .unwrap_or_else(|_| json!({ "statusCode": response.status() }));
            (ServiceStatus::Healthy, details)
        }
        Ok(response) if response.status() >= 500 => (
            ServiceStatus::Unhealthy,
            json!({ "statusCode": response.status() }),
        ),
        Ok(response) => (
            ServiceStatus::Degraded,
            json!({ "statusCode": response.status() }),
        ),
        Err(err) => (ServiceStatus::Unhealthy, json!({ "error": err.to_string() })),
    }
}
