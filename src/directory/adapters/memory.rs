//! In-memory service repository.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::directory::{
    domain::{
        AppliedTransition, Service, ServiceId, ServiceKind, ServiceStatus, ServiceTransition,
    },
    ports::{ServiceRepository, ServiceRepositoryError, ServiceRepositoryResult},
};

/// Thread-safe in-memory service repository.
///
/// Entries are kept in identifier order so listings are deterministic.
#[derive(Debug, Clone, Default)]
pub struct InMemoryServiceRepository {
    state: Arc<RwLock<BTreeMap<ServiceId, Service>>>,
}

impl InMemoryServiceRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> ServiceRepositoryResult<RwLockReadGuard<'_, BTreeMap<ServiceId, Service>>> {
        self.state.read().map_err(|err| {
            ServiceRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(
        &self,
    ) -> ServiceRepositoryResult<RwLockWriteGuard<'_, BTreeMap<ServiceId, Service>>> {
        self.state.write().map_err(|err| {
            ServiceRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn filtered(
        &self,
        predicate: impl Fn(&Service) -> bool,
    ) -> ServiceRepositoryResult<Vec<Service>> {
        let services = self.read()?;
        Ok(services
            .values()
            .filter(|service| predicate(service))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ServiceRepository for InMemoryServiceRepository {
    async fn insert(&self, service: &Service) -> ServiceRepositoryResult<()> {
        let mut services = self.write()?;
        if services.contains_key(service.id()) {
            return Err(ServiceRepositoryError::DuplicateService(service.id().clone()));
        }
        services.insert(service.id().clone(), service.clone());
        Ok(())
    }

    async fn apply(
        &self,
        id: &ServiceId,
        transition: ServiceTransition,
    ) -> ServiceRepositoryResult<Option<AppliedTransition>> {
        let mut services = self.write()?;
        Ok(services.get_mut(id).map(|service| {
            let previous = service.apply(transition);
            AppliedTransition::new(previous, service.clone())
        }))
    }

    async fn find_by_id(&self, id: &ServiceId) -> ServiceRepositoryResult<Option<Service>> {
        Ok(self.read()?.get(id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> ServiceRepositoryResult<Option<Service>> {
        let services = self.read()?;
        Ok(services.values().find(|s| s.name() == name).cloned())
    }

    async fn list_all(&self) -> ServiceRepositoryResult<Vec<Service>> {
        Ok(self.read()?.values().cloned().collect())
    }

    async fn list_by_kind(&self, kind: ServiceKind) -> ServiceRepositoryResult<Vec<Service>> {
        self.filtered(|service| service.kind() == kind)
    }

    async fn list_by_status(
        &self,
        status: ServiceStatus,
    ) -> ServiceRepositoryResult<Vec<Service>> {
        self.filtered(|service| service.status() == status)
    }

    async fn list_by_capability(&self, capability: &str) -> ServiceRepositoryResult<Vec<Service>> {
        self.filtered(|service| service.has_capability(capability))
    }

    async fn delete(&self, id: &ServiceId) -> ServiceRepositoryResult<bool> {
        Ok(self.write()?.remove(id).is_some())
    }

    async fn exists(&self, id: &ServiceId) -> ServiceRepositoryResult<bool> {
        Ok(self.read()?.contains_key(id))
    }

    async fn count(&self) -> ServiceRepositoryResult<usize> {
        Ok(self.read()?.len())
    }
}
