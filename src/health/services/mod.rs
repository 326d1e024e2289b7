//! Application services for health monitoring.

mod monitor;

pub use monitor::{HealthMonitor, HealthMonitorError, HealthMonitorResult, MIN_SWEEP_INTERVAL};
