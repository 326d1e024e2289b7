//! Pure health classification and aggregation rules.

mod probe;
mod summary;

pub use probe::classify_probe;
pub use summary::{HealthSummary, overall_status};
