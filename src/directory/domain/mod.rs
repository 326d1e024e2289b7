//! Domain model for the service directory.
//!
//! The directory domain models registered network services: their identity,
//! location, advertised capabilities, and the single mutable state bundle
//! (status, last-seen time, cached health result) that health checks, the
//! gateway, and heartbeats replace. Infrastructure concerns stay outside the
//! domain boundary.

mod capability;
mod endpoint;
mod error;
mod health;
mod ids;
mod kind;
mod service;
mod status;

pub use capability::Capability;
pub use endpoint::{BaseUrl, DEFAULT_HEALTH_PATH, HealthPath};
pub use error::{DirectoryDomainError, ParseServiceKindError, ParseServiceStatusError};
pub use health::HealthCheckResult;
pub use ids::{ServiceId, slugify};
pub use kind::ServiceKind;
pub use service::{
    AppliedTransition, DEFAULT_SERVICE_VERSION, Service, ServiceDefinition, ServiceState,
    ServiceTransition,
};
pub use status::ServiceStatus;
