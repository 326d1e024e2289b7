//! Service aggregate root and its mutable state bundle.

use super::{
    BaseUrl, Capability, DirectoryDomainError, HealthCheckResult, HealthPath, ServiceId,
    ServiceKind, ServiceStatus,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

/// Version assigned when a registration does not declare one.
pub const DEFAULT_SERVICE_VERSION: &str = "1.0.0";

/// Validated registration input for a new service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDefinition {
    id: ServiceId,
    name: String,
    kind: ServiceKind,
    base_url: BaseUrl,
    health_path: HealthPath,
    capabilities: Vec<Capability>,
    metadata: Map<String, Value>,
    version: String,
}

impl ServiceDefinition {
    /// Creates a definition with the required fields.
    ///
    /// The identifier is derived from the name; the health path, version,
    /// capabilities, and metadata take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError`] when the name is blank or yields no
    /// identifier, or when the base URL is not a valid absolute URL.
    pub fn new(
        raw_name: impl Into<String>,
        kind: ServiceKind,
        raw_base_url: impl Into<String>,
    ) -> Result<Self, DirectoryDomainError> {
        let name = raw_name.into().trim().to_owned();
        let id = ServiceId::new(&name)?;
        let base_url = BaseUrl::new(raw_base_url)?;

        Ok(Self {
            id,
            name,
            kind,
            base_url,
            health_path: HealthPath::default(),
            capabilities: Vec::new(),
            metadata: Map::new(),
            version: DEFAULT_SERVICE_VERSION.to_owned(),
        })
    }

    /// Sets the health check path.
    #[must_use]
    pub fn with_health_path(mut self, health_path: HealthPath) -> Self {
        self.health_path = health_path;
        self
    }

    /// Sets the advertised capabilities.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: impl IntoIterator<Item = Capability>) -> Self {
        self.capabilities = capabilities.into_iter().collect();
        self
    }

    /// Sets the opaque metadata map.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Sets the service version.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::EmptyVersion`] when the version is
    /// blank.
    pub fn with_version(
        mut self,
        raw_version: impl Into<String>,
    ) -> Result<Self, DirectoryDomainError> {
        let version = raw_version.into().trim().to_owned();
        if version.is_empty() {
            return Err(DirectoryDomainError::EmptyVersion);
        }
        self.version = version;
        Ok(self)
    }

    /// Returns the derived identifier.
    #[must_use]
    pub const fn id(&self) -> &ServiceId {
        &self.id
    }

    /// Returns the trimmed display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The only part of a [`Service`] that changes after registration.
///
/// Writers never patch individual fields; every change produces a whole new
/// bundle through [`Service::apply`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceState {
    status: ServiceStatus,
    last_seen_at: DateTime<Utc>,
    last_health_check: Option<HealthCheckResult>,
}

impl ServiceState {
    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> ServiceStatus {
        self.status
    }

    /// Returns the last-seen timestamp.
    #[must_use]
    pub const fn last_seen_at(&self) -> DateTime<Utc> {
        self.last_seen_at
    }

    /// Returns the cached health check result, if any.
    #[must_use]
    pub const fn last_health_check(&self) -> Option<&HealthCheckResult> {
        self.last_health_check.as_ref()
    }
}

/// A state change applied atomically to a stored service.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceTransition {
    /// The service was observed alive (heartbeat, proxied call, re-register).
    Seen {
        /// Observation time.
        at: DateTime<Utc>,
    },
    /// An active health check completed.
    Checked(HealthCheckResult),
    /// The service announced it is shutting down.
    Stopping {
        /// Announcement time.
        at: DateTime<Utc>,
    },
}

/// Outcome of a transition applied to a stored service.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedTransition {
    previous: ServiceStatus,
    service: Service,
}

impl AppliedTransition {
    /// Pairs the status overwritten by a transition with the updated snapshot.
    #[must_use]
    pub const fn new(previous: ServiceStatus, service: Service) -> Self {
        Self { previous, service }
    }

    /// Returns the status the entry held immediately before the transition.
    #[must_use]
    pub const fn previous(&self) -> ServiceStatus {
        self.previous
    }

    /// Returns the updated snapshot.
    #[must_use]
    pub const fn service(&self) -> &Service {
        &self.service
    }

    /// Consumes the outcome, returning the updated snapshot.
    #[must_use]
    pub fn into_service(self) -> Service {
        self.service
    }
}

/// Registered service aggregate root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    id: ServiceId,
    name: String,
    kind: ServiceKind,
    base_url: BaseUrl,
    health_path: HealthPath,
    capabilities: Vec<Capability>,
    metadata: Map<String, Value>,
    version: String,
    registered_at: DateTime<Utc>,
    #[serde(flatten)]
    state: ServiceState,
}

impl Service {
    /// Creates a newly registered service in [`ServiceStatus::Starting`].
    #[must_use]
    pub fn register(definition: ServiceDefinition, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        let ServiceDefinition {
            id,
            name,
            kind,
            base_url,
            health_path,
            capabilities,
            metadata,
            version,
        } = definition;

        Self {
            id,
            name,
            kind,
            base_url,
            health_path,
            capabilities,
            metadata,
            version,
            registered_at: timestamp,
            state: ServiceState {
                status: ServiceStatus::Starting,
                last_seen_at: timestamp,
                last_health_check: None,
            },
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> &ServiceId {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the service kind.
    #[must_use]
    pub const fn kind(&self) -> ServiceKind {
        self.kind
    }

    /// Returns the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the health check path.
    #[must_use]
    pub const fn health_path(&self) -> &HealthPath {
        &self.health_path
    }

    /// Returns the advertised capabilities.
    #[must_use]
    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    /// Returns whether a capability with the given name is advertised.
    #[must_use]
    pub fn has_capability(&self, name: &str) -> bool {
        self.capabilities.iter().any(|c| c.name() == name)
    }

    /// Returns the opaque metadata map.
    #[must_use]
    pub const fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    /// Returns the declared version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the registration timestamp.
    #[must_use]
    pub const fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    /// Returns the current mutable state bundle.
    #[must_use]
    pub const fn state(&self) -> &ServiceState {
        &self.state
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> ServiceStatus {
        self.state.status
    }

    /// Returns the last-seen timestamp.
    #[must_use]
    pub const fn last_seen_at(&self) -> DateTime<Utc> {
        self.state.last_seen_at
    }

    /// Returns the cached health check result, if any.
    #[must_use]
    pub const fn last_health_check(&self) -> Option<&HealthCheckResult> {
        self.state.last_health_check.as_ref()
    }

    /// Returns the URL probed by active health checks.
    ///
    /// # Errors
    ///
    /// Returns [`url::ParseError`] when the base URL and health path do not
    /// combine into a valid URL.
    pub fn health_url(&self) -> Result<Url, url::ParseError> {
        self.base_url.join(self.health_path.as_str(), std::iter::empty())
    }

    /// Applies a transition, replacing the whole state bundle.
    ///
    /// `last_seen_at` never moves backward: an older timestamp carried by the
    /// transition leaves the stored one in place. Returns the status held
    /// before the transition.
    pub fn apply(&mut self, transition: ServiceTransition) -> ServiceStatus {
        let current = &self.state;
        let previous = current.status;
        let next = match transition {
            ServiceTransition::Seen { at } => ServiceState {
                status: current.status,
                last_seen_at: current.last_seen_at.max(at),
                last_health_check: current.last_health_check.clone(),
            },
            ServiceTransition::Checked(result) => ServiceState {
                status: result.status(),
                last_seen_at: current.last_seen_at.max(result.checked_at()),
                last_health_check: Some(result),
            },
            ServiceTransition::Stopping { at } => ServiceState {
                status: ServiceStatus::Stopping,
                last_seen_at: current.last_seen_at.max(at),
                last_health_check: current.last_health_check.clone(),
            },
        };
        self.state = next;
        previous
    }
}
