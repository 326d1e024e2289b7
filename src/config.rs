//! Runtime configuration for the control plane.

use serde::Deserialize;
use std::time::Duration;

/// Tunables for health checking, proxying and event retention.
///
/// Every field has a default, so a partial JSON document is enough to
/// override a single value.
///
/// # Examples
///
/// ```
/// use switchboard::config::ControlPlaneConfig;
///
/// let config = ControlPlaneConfig::default();
/// assert_eq!(config.event_history_capacity, 100);
///
/// let parsed: ControlPlaneConfig =
///     serde_json::from_str(r#"{"proxy_timeout_ms": 1500}"#).expect("valid config");
/// assert_eq!(parsed.proxy_timeout_ms, 1500);
/// assert_eq!(parsed.health_check_timeout_ms, 5000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ControlPlaneConfig {
    /// Interval between periodic health sweeps, in milliseconds.
    pub health_check_interval_ms: u64,
    /// Deadline for a single active health check, in milliseconds.
    pub health_check_timeout_ms: u64,
    /// Deadline for proxied calls that do not carry their own, in milliseconds.
    pub proxy_timeout_ms: u64,
    /// Number of events retained by the event bus.
    pub event_history_capacity: usize,
    /// Whether the bootstrap starts periodic health checking immediately.
    pub health_check_on_start: bool,
}

impl Default for ControlPlaneConfig {
    fn default() -> Self {
        Self {
            health_check_interval_ms: 30_000,
            health_check_timeout_ms: 5_000,
            proxy_timeout_ms: 30_000,
            event_history_capacity: 100,
            health_check_on_start: true,
        }
    }
}

impl ControlPlaneConfig {
    /// Creates a configuration with short deadlines for local development.
    #[must_use]
    pub const fn fast() -> Self {
        Self {
            health_check_interval_ms: 2_000,
            health_check_timeout_ms: 500,
            proxy_timeout_ms: 2_000,
            event_history_capacity: 100,
            health_check_on_start: true,
        }
    }

    /// Returns the health sweep interval.
    #[must_use]
    pub const fn health_check_interval(&self) -> Duration {
        Duration::from_millis(self.health_check_interval_ms)
    }

    /// Returns the per-check health deadline.
    #[must_use]
    pub const fn health_check_timeout(&self) -> Duration {
        Duration::from_millis(self.health_check_timeout_ms)
    }

    /// Returns the default proxy deadline.
    #[must_use]
    pub const fn proxy_timeout(&self) -> Duration {
        Duration::from_millis(self.proxy_timeout_ms)
    }
}
