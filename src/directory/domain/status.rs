//! Service availability status.

use super::ParseServiceStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operational status of a registered service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    /// Registered but not yet checked.
    Starting,
    /// The last active check answered with a 2xx status.
    Healthy,
    /// The last active check failed, timed out, or answered with 5xx.
    Unhealthy,
    /// The last active check answered with a non-2xx status below 500.
    Degraded,
    /// No such service in the directory. Never stored on an entry.
    Unknown,
    /// The service announced it is shutting down.
    Stopping,
}

impl ServiceStatus {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Starting => "starting",
            Self::Healthy => "healthy",
            Self::Unhealthy => "unhealthy",
            Self::Degraded => "degraded",
            Self::Unknown => "unknown",
            Self::Stopping => "stopping",
        }
    }

    /// Returns whether a service in this status may receive proxied traffic.
    #[must_use]
    pub const fn is_available(self) -> bool {
        matches!(self, Self::Healthy | Self::Degraded)
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ServiceStatus {
    type Error = ParseServiceStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "starting" => Ok(Self::Starting),
            "healthy" => Ok(Self::Healthy),
            "unhealthy" => Ok(Self::Unhealthy),
            "degraded" => Ok(Self::Degraded),
            "unknown" => Ok(Self::Unknown),
            "stopping" => Ok(Self::Stopping),
            _ => Err(ParseServiceStatusError(value.to_owned())),
        }
    }
}
