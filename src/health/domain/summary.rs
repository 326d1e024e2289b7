//! Aggregated availability across the directory.

use crate::directory::domain::ServiceStatus;
use serde::{Deserialize, Serialize};

/// Counts of services per availability bucket plus one overall status.
///
/// Statuses other than healthy, degraded, and unhealthy (a service still
/// starting, one that is stopping) are counted as unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthSummary {
    /// Number of services considered.
    pub total: usize,
    /// Services whose last check was healthy.
    pub healthy: usize,
    /// Services whose last check was unhealthy.
    pub unhealthy: usize,
    /// Services whose last check was degraded.
    pub degraded: usize,
    /// Services in any other status.
    pub unknown: usize,
    /// Status derived from the counts by [`overall_status`].
    pub overall: ServiceStatus,
}

impl HealthSummary {
    /// Summarises a set of statuses.
    #[must_use]
    pub fn from_statuses(statuses: impl IntoIterator<Item = ServiceStatus>) -> Self {
        let mut total = 0_usize;
        let mut healthy = 0_usize;
        let mut unhealthy = 0_usize;
        let mut degraded = 0_usize;

        for status in statuses {
            total += 1;
            match status {
                ServiceStatus::Healthy => healthy += 1,
                ServiceStatus::Unhealthy => unhealthy += 1,
                ServiceStatus::Degraded => degraded += 1,
                ServiceStatus::Starting | ServiceStatus::Unknown | ServiceStatus::Stopping => {}
            }
        }

        Self {
            total,
            healthy,
            unhealthy,
            degraded,
            unknown: total.saturating_sub(healthy + unhealthy + degraded),
            overall: overall_status(total, healthy, degraded, unhealthy),
        }
    }
}

/// Derives the overall status from per-bucket counts.
///
/// Unhealthy when every service is unhealthy, degraded when any service is
/// unhealthy or degraded, healthy when any service is healthy, and unknown
/// otherwise (including an empty directory).
///
/// # Examples
///
/// ```
/// use switchboard::directory::domain::ServiceStatus;
/// use switchboard::health::domain::overall_status;
///
/// assert_eq!(overall_status(3, 2, 0, 1), ServiceStatus::Degraded);
/// assert_eq!(overall_status(0, 0, 0, 0), ServiceStatus::Unknown);
/// ```
#[must_use]
pub const fn overall_status(
    total: usize,
    healthy: usize,
    degraded: usize,
    unhealthy: usize,
) -> ServiceStatus {
    if total > 0 && unhealthy == total {
        ServiceStatus::Unhealthy
    } else if unhealthy > 0 || degraded > 0 {
        ServiceStatus::Degraded
    } else if healthy > 0 {
        ServiceStatus::Healthy
    } else {
        ServiceStatus::Unknown
    }
}
