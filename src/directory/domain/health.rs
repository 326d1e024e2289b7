//! Cached outcome of an active health check.

use super::ServiceStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of one active health check against a service.
///
/// Produced by the health monitor and stored onto the service; never mutated
/// after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthCheckResult {
    status: ServiceStatus,
    checked_at: DateTime<Utc>,
    latency_ms: u64,
    #[serde(default)]
    details: Value,
}

impl HealthCheckResult {
    /// Creates a health check result.
    #[must_use]
    pub const fn new(
        status: ServiceStatus,
        checked_at: DateTime<Utc>,
        latency_ms: u64,
        details: Value,
    ) -> Self {
        Self {
            status,
            checked_at,
            latency_ms,
            details,
        }
    }

    /// Returns the status the check arrived at.
    #[must_use]
    pub const fn status(&self) -> ServiceStatus {
        self.status
    }

    /// Returns when the check completed.
    #[must_use]
    pub const fn checked_at(&self) -> DateTime<Utc> {
        self.checked_at
    }

    /// Returns how long the probe took, in milliseconds.
    #[must_use]
    pub const fn latency_ms(&self) -> u64 {
        self.latency_ms
    }

    /// Returns the diagnostic payload captured by the probe.
    #[must_use]
    pub const fn details(&self) -> &Value {
        &self.details
    }
}
