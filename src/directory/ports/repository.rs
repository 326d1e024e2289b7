//! Repository port for service directory persistence and lookup.

use crate::directory::domain::{
    AppliedTransition, Service, ServiceId, ServiceKind, ServiceStatus, ServiceTransition,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for service repository operations.
pub type ServiceRepositoryResult<T> = Result<T, ServiceRepositoryError>;

/// Service directory persistence contract.
///
/// Implementations must tolerate concurrent reads and writes without
/// corrupting any single entry. No cross-entry transactional guarantee is
/// required.
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    /// Stores a newly registered service.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceRepositoryError::DuplicateService`] when an entry with
    /// the same identifier already exists.
    async fn insert(&self, service: &Service) -> ServiceRepositoryResult<()>;

    /// Applies a state transition to a stored service in one step.
    ///
    /// The returned outcome carries the updated snapshot and the status the
    /// entry held when the transition replaced it, both read under the same
    /// write. Returns `None` when the service does not exist.
    async fn apply(
        &self,
        id: &ServiceId,
        transition: ServiceTransition,
    ) -> ServiceRepositoryResult<Option<AppliedTransition>>;

    /// Finds a service by identifier.
    async fn find_by_id(&self, id: &ServiceId) -> ServiceRepositoryResult<Option<Service>>;

    /// Finds a service by its exact display name.
    async fn find_by_name(&self, name: &str) -> ServiceRepositoryResult<Option<Service>>;

    /// Returns every registered service, ordered by identifier.
    async fn list_all(&self) -> ServiceRepositoryResult<Vec<Service>>;

    /// Returns every service of the given kind.
    async fn list_by_kind(&self, kind: ServiceKind) -> ServiceRepositoryResult<Vec<Service>>;

    /// Returns every service currently in the given status.
    async fn list_by_status(&self, status: ServiceStatus)
    -> ServiceRepositoryResult<Vec<Service>>;

    /// Returns every service advertising a capability with the given name.
    async fn list_by_capability(&self, capability: &str) -> ServiceRepositoryResult<Vec<Service>>;

    /// Removes a service, returning whether it existed.
    async fn delete(&self, id: &ServiceId) -> ServiceRepositoryResult<bool>;

    /// Returns whether a service with the identifier exists.
    async fn exists(&self, id: &ServiceId) -> ServiceRepositoryResult<bool>;

    /// Returns the number of registered services.
    async fn count(&self) -> ServiceRepositoryResult<usize>;
}

/// Errors returned by service repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ServiceRepositoryError {
    /// A service with the same identifier already exists.
    #[error("duplicate service identifier: {0}")]
    DuplicateService(ServiceId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ServiceRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
