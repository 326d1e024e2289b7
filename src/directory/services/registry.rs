//! Service layer for service registration and discovery.
//!
//! Provides [`ServiceDirectory`], the single source of truth for what is
//! registered. Every state change it makes is announced on the event bus.

use crate::directory::{
    domain::{
        AppliedTransition, Capability, DirectoryDomainError, HealthPath, Service,
        ServiceDefinition, ServiceId, ServiceKind, ServiceStatus, ServiceTransition,
    },
    ports::{ServiceRepository, ServiceRepositoryError},
};
use crate::error::ErrorCode;
use crate::events::{DomainEvent, EventBus, EventType};
use chrono::TimeDelta;
use mockable::Clock;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Request payload for registering a service.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterServiceRequest {
    name: String,
    kind: ServiceKind,
    base_url: String,
    health_path: Option<String>,
    capabilities: Vec<Capability>,
    metadata: Map<String, Value>,
    version: Option<String>,
}

impl RegisterServiceRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ServiceKind, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            base_url: base_url.into(),
            health_path: None,
            capabilities: Vec::new(),
            metadata: Map::new(),
            version: None,
        }
    }

    /// Sets the health check path.
    #[must_use]
    pub fn with_health_path(mut self, health_path: impl Into<String>) -> Self {
        self.health_path = Some(health_path.into());
        self
    }

    /// Adds a capability.
    #[must_use]
    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities.push(capability);
        self
    }

    /// Adds a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Sets the service version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    fn into_definition(self) -> Result<ServiceDefinition, DirectoryDomainError> {
        let Self {
            name,
            kind,
            base_url,
            health_path,
            capabilities,
            metadata,
            version,
        } = self;

        let mut definition = ServiceDefinition::new(name, kind, base_url)?
            .with_capabilities(capabilities)
            .with_metadata(metadata);
        if let Some(path) = health_path {
            definition = definition.with_health_path(HealthPath::new(path)?);
        }
        if let Some(raw_version) = version {
            definition = definition.with_version(raw_version)?;
        }
        Ok(definition)
    }
}

/// Service-level errors for directory operations.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] DirectoryDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ServiceRepositoryError),
    /// No service exists with the given identifier.
    #[error("service {0} not found")]
    NotFound(ServiceId),
    /// The derived identifier is already taken by a service with another name.
    #[error("service id {id} is already registered under the name '{existing_name}'")]
    Conflict {
        /// Derived identifier.
        id: ServiceId,
        /// Name of the entry holding the identifier.
        existing_name: String,
    },
}

impl DirectoryError {
    /// Returns the stable error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Domain(_) => ErrorCode::Validation,
            Self::Repository(ServiceRepositoryError::DuplicateService(_))
            | Self::Conflict { .. } => ErrorCode::Conflict,
            Self::Repository(ServiceRepositoryError::Persistence(_)) => ErrorCode::Storage,
            Self::NotFound(_) => ErrorCode::NotFound,
        }
    }
}

/// Result type for directory service operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Service registration and discovery orchestration service.
pub struct ServiceDirectory<R, C>
where
    R: ServiceRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    events: Arc<EventBus>,
    clock: Arc<C>,
}

impl<R, C> Clone for ServiceDirectory<R, C>
where
    R: ServiceRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            events: Arc::clone(&self.events),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, C> ServiceDirectory<R, C>
where
    R: ServiceRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new directory service.
    #[must_use]
    pub const fn new(repository: Arc<R>, events: Arc<EventBus>, clock: Arc<C>) -> Self {
        Self {
            repository,
            events,
            clock,
        }
    }

    /// Registers a service, or refreshes an existing registration.
    ///
    /// Registering a name whose identifier is already held by an entry with
    /// the same name refreshes that entry's last-seen time and returns its
    /// current snapshot; every other field of the request is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Domain`] when validation fails,
    /// [`DirectoryError::Conflict`] when the identifier belongs to a service
    /// registered under a different name, or repository errors.
    pub async fn register(&self, request: RegisterServiceRequest) -> DirectoryResult<Service> {
        let definition = request.into_definition()?;

        if let Some(existing) = self.repository.find_by_id(definition.id()).await? {
            return self.refresh_existing(&existing, &definition).await;
        }

        let service = Service::register(definition, &*self.clock);
        match self.repository.insert(&service).await {
            Ok(()) => {}
            Err(ServiceRepositoryError::DuplicateService(id)) => {
                // Lost a race with a concurrent registration of the same id.
                let existing = self
                    .repository
                    .find_by_id(&id)
                    .await?
                    .ok_or(DirectoryError::NotFound(id))?;
                let requested = ServiceDefinition::new(
                    service.name(),
                    service.kind(),
                    service.base_url().as_str(),
                )?;
                return self.refresh_existing(&existing, &requested).await;
            }
            Err(err) => return Err(err.into()),
        }

        info!(
            service_id = %service.id(),
            kind = %service.kind(),
            base_url = %service.base_url(),
            "service registered"
        );
        self.publish(
            EventType::ServiceRegistered,
            service.id(),
            json!({
                "name": service.name(),
                "type": service.kind(),
                "baseUrl": service.base_url(),
                "version": service.version(),
            }),
        );
        Ok(service)
    }

    async fn refresh_existing(
        &self,
        existing: &Service,
        definition: &ServiceDefinition,
    ) -> DirectoryResult<Service> {
        if existing.name() != definition.name() {
            return Err(DirectoryError::Conflict {
                id: existing.id().clone(),
                existing_name: existing.name().to_owned(),
            });
        }

        debug!(service_id = %existing.id(), "service re-registered; refreshing last seen");
        self.repository
            .apply(
                existing.id(),
                ServiceTransition::Seen {
                    at: self.clock.utc(),
                },
            )
            .await?
            .map(AppliedTransition::into_service)
            .ok_or_else(|| DirectoryError::NotFound(existing.id().clone()))
    }

    /// Removes a service, returning whether it was registered.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Repository`] when persistence fails.
    pub async fn deregister(&self, id: &ServiceId) -> DirectoryResult<bool> {
        let removed = self.repository.delete(id).await?;
        if removed {
            info!(service_id = %id, "service deregistered");
            self.publish(EventType::ServiceDeregistered, id, json!({}));
        }
        Ok(removed)
    }

    /// Returns a service or a not-found error.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::NotFound`] when no service has the
    /// identifier, or repository errors.
    pub async fn get(&self, id: &ServiceId) -> DirectoryResult<Service> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| DirectoryError::NotFound(id.clone()))
    }

    /// Finds a service by identifier.
    ///
    /// Returns `Ok(None)` when no service has the identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Repository`] when persistence lookup fails.
    pub async fn find(&self, id: &ServiceId) -> DirectoryResult<Option<Service>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Finds a service by its display name.
    ///
    /// Returns `Ok(None)` when no service has the name.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Repository`] when persistence lookup fails.
    pub async fn find_by_name(&self, name: &str) -> DirectoryResult<Option<Service>> {
        Ok(self.repository.find_by_name(name.trim()).await?)
    }

    /// Lists registered services, optionally restricted to one kind.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Repository`] when persistence lookup fails.
    pub async fn list(&self, kind: Option<ServiceKind>) -> DirectoryResult<Vec<Service>> {
        let services = match kind {
            Some(wanted) => self.repository.list_by_kind(wanted).await?,
            None => self.repository.list_all().await?,
        };
        Ok(services)
    }

    /// Lists services currently in the given status.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Repository`] when persistence lookup fails.
    pub async fn list_by_status(&self, status: ServiceStatus) -> DirectoryResult<Vec<Service>> {
        Ok(self.repository.list_by_status(status).await?)
    }

    /// Lists services whose last check was healthy.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Repository`] when persistence lookup fails.
    pub async fn list_healthy(&self) -> DirectoryResult<Vec<Service>> {
        self.list_by_status(ServiceStatus::Healthy).await
    }

    /// Lists services eligible for proxied traffic (healthy or degraded).
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Repository`] when persistence lookup fails.
    pub async fn list_available(&self) -> DirectoryResult<Vec<Service>> {
        let services = self.repository.list_all().await?;
        Ok(services
            .into_iter()
            .filter(|service| service.status().is_available())
            .collect())
    }

    /// Lists services advertising a capability with the given name.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Repository`] when persistence lookup fails.
    pub async fn find_by_capability(&self, capability: &str) -> DirectoryResult<Vec<Service>> {
        Ok(self.repository.list_by_capability(capability.trim()).await?)
    }

    /// Records that a service is alive.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::NotFound`] when no service has the
    /// identifier, or repository errors.
    pub async fn heartbeat(&self, id: &ServiceId) -> DirectoryResult<Service> {
        let updated = self
            .repository
            .apply(
                id,
                ServiceTransition::Seen {
                    at: self.clock.utc(),
                },
            )
            .await?
            .map(AppliedTransition::into_service)
            .ok_or_else(|| DirectoryError::NotFound(id.clone()))?;

        debug!(service_id = %id, "heartbeat received");
        self.publish(
            EventType::ServiceHeartbeat,
            id,
            json!({ "lastSeenAt": updated.last_seen_at() }),
        );
        Ok(updated)
    }

    /// Marks a service as [`ServiceStatus::Stopping`] ahead of deregistration.
    ///
    /// A stopping service no longer receives proxied traffic. A later active
    /// health check overwrites the status like any other.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::NotFound`] when no service has the
    /// identifier, or repository errors.
    pub async fn begin_shutdown(&self, id: &ServiceId) -> DirectoryResult<Service> {
        let applied = self
            .repository
            .apply(
                id,
                ServiceTransition::Stopping {
                    at: self.clock.utc(),
                },
            )
            .await?
            .ok_or_else(|| DirectoryError::NotFound(id.clone()))?;
        let previous = applied.previous();
        let updated = applied.into_service();

        info!(service_id = %id, previous = %previous, "service stopping");
        self.publish(
            EventType::ServiceStopping,
            id,
            json!({ "previous": previous }),
        );
        Ok(updated)
    }

    /// Lists services not seen for longer than `max_age`.
    ///
    /// This is a query only; stale services are never removed implicitly.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Repository`] when persistence lookup fails.
    pub async fn list_stale(&self, max_age: TimeDelta) -> DirectoryResult<Vec<Service>> {
        let now = self.clock.utc();
        let services = self.repository.list_all().await?;
        Ok(services
            .into_iter()
            .filter(|service| now.signed_duration_since(service.last_seen_at()) > max_age)
            .collect())
    }

    /// Returns whether a service with the identifier is registered.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Repository`] when persistence lookup fails.
    pub async fn exists(&self, id: &ServiceId) -> DirectoryResult<bool> {
        Ok(self.repository.exists(id).await?)
    }

    /// Returns the number of registered services.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Repository`] when persistence lookup fails.
    pub async fn count(&self) -> DirectoryResult<usize> {
        Ok(self.repository.count().await?)
    }

    fn publish(&self, event_type: EventType, id: &ServiceId, data: Value) {
        self.events
            .emit(DomainEvent::new(event_type, data, &*self.clock).for_service(id.as_str()));
    }
}
