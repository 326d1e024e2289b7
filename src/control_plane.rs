//! Bootstrap that wires the directory, health monitor, gateway, and event
//! bus around one shared repository, transport, and clock.

use crate::config::ControlPlaneConfig;
use crate::directory::{
    adapters::InMemoryServiceRepository, ports::ServiceRepository, services::ServiceDirectory,
};
use crate::events::{DEFAULT_RECENT_LIMIT, DomainEvent, EventBus};
use crate::gateway::services::Gateway;
use crate::health::services::HealthMonitor;
use crate::transport::{ServiceTransport, TransportResult, adapters::HttpServiceTransport};
use mockable::{Clock, DefaultClock};
use std::sync::Arc;
use tracing::info;

/// A control plane backed by in-process storage and real HTTP.
pub type InMemoryControlPlane =
    ControlPlane<InMemoryServiceRepository, HttpServiceTransport, DefaultClock>;

/// The assembled control plane.
///
/// Every component shares the same repository and event bus, so a
/// registration made through [`Self::directory`] is immediately visible to
/// [`Self::health`] and [`Self::gateway`].
pub struct ControlPlane<R, T, C>
where
    R: ServiceRepository + 'static,
    T: ServiceTransport + 'static,
    C: Clock + Send + Sync + 'static,
{
    config: ControlPlaneConfig,
    events: Arc<EventBus>,
    directory: ServiceDirectory<R, C>,
    health: HealthMonitor<R, T, C>,
    gateway: Gateway<R, T, C>,
}

impl<R, T, C> ControlPlane<R, T, C>
where
    R: ServiceRepository + 'static,
    T: ServiceTransport + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Wires the components. Nothing runs until [`Self::start`].
    #[must_use]
    pub fn new(
        config: ControlPlaneConfig,
        repository: Arc<R>,
        transport: Arc<T>,
        clock: Arc<C>,
    ) -> Self {
        let events = Arc::new(EventBus::new(config.event_history_capacity));
        let directory = ServiceDirectory::new(
            Arc::clone(&repository),
            Arc::clone(&events),
            Arc::clone(&clock),
        );
        let health = HealthMonitor::new(
            Arc::clone(&repository),
            Arc::clone(&transport),
            Arc::clone(&events),
            Arc::clone(&clock),
            config.health_check_timeout(),
        );
        let gateway = Gateway::new(
            repository,
            transport,
            Arc::clone(&events),
            clock,
            config.proxy_timeout(),
        );

        Self {
            config,
            events,
            directory,
            health,
            gateway,
        }
    }

    /// Returns the configuration in effect.
    #[must_use]
    pub const fn config(&self) -> &ControlPlaneConfig {
        &self.config
    }

    /// Returns the shared event bus.
    #[must_use]
    pub const fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    /// Returns the service directory.
    #[must_use]
    pub const fn directory(&self) -> &ServiceDirectory<R, C> {
        &self.directory
    }

    /// Returns the health monitor.
    #[must_use]
    pub const fn health(&self) -> &HealthMonitor<R, T, C> {
        &self.health
    }

    /// Returns the gateway.
    #[must_use]
    pub const fn gateway(&self) -> &Gateway<R, T, C> {
        &self.gateway
    }

    /// Starts periodic health checking when the configuration asks for it.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&self) {
        if self.config.health_check_on_start {
            self.health
                .start_periodic(self.config.health_check_interval());
        }
        info!(
            periodic_checks = self.config.health_check_on_start,
            event_capacity = self.events.capacity(),
            "control plane started"
        );
    }

    /// Stops background work.
    pub fn shutdown(&self) {
        self.health.stop_periodic();
        info!("control plane stopped");
    }

    /// Returns up to `limit` recent events, newest first (50 when absent).
    #[must_use]
    pub fn recent_events(&self, limit: Option<usize>) -> Vec<DomainEvent> {
        self.events.recent_events(limit.unwrap_or(DEFAULT_RECENT_LIMIT))
    }
}

impl InMemoryControlPlane {
    /// Builds a control plane with in-memory storage and an HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns a transport error when the HTTP client cannot be created.
    pub fn in_memory(config: ControlPlaneConfig) -> TransportResult<Self> {
        let transport = HttpServiceTransport::new()?;
        Ok(Self::new(
            config,
            Arc::new(InMemoryServiceRepository::new()),
            Arc::new(transport),
            Arc::new(DefaultClock),
        ))
    }
}
