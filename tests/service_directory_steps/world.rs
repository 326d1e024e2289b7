//! Shared world state for service directory BDD scenarios.

use std::collections::BTreeMap;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use switchboard::config::ControlPlaneConfig;
use switchboard::control_plane::ControlPlane;
use switchboard::directory::{
    adapters::InMemoryServiceRepository,
    domain::{Service, ServiceId, ServiceKind},
    services::{DirectoryError, RegisterServiceRequest},
};
use switchboard::gateway::domain::BroadcastOutcome;
use switchboard::transport::adapters::InMemoryServiceTransport;

/// Control plane type used by the BDD world.
pub type TestControlPlane =
    ControlPlane<InMemoryServiceRepository, InMemoryServiceTransport, DefaultClock>;

/// Service description queued before registration.
pub struct PendingService {
    /// Display name.
    pub name: String,
    /// Service kind as written in the scenario.
    pub kind: String,
    /// Base URL.
    pub base_url: String,
}

/// Scenario world for service directory behaviour tests.
pub struct DirectoryWorld {
    /// The control plane under test.
    pub plane: TestControlPlane,
    /// Scripted transport shared with the control plane.
    pub transport: Arc<InMemoryServiceTransport>,
    /// Services queued for registration.
    pub pending_services: Vec<PendingService>,
    /// Services registered so far.
    pub registered_services: Vec<Service>,
    /// Result of the last registration attempt.
    pub last_register_result: Option<Result<Service, DirectoryError>>,
    /// Outcomes of the last broadcast.
    pub last_broadcast: Option<BTreeMap<ServiceId, BroadcastOutcome>>,
}

impl DirectoryWorld {
    /// Creates a world with an empty directory and no scripted replies.
    #[must_use]
    pub fn new() -> Self {
        let transport = Arc::new(InMemoryServiceTransport::new());
        let plane = ControlPlane::new(
            ControlPlaneConfig::fast(),
            Arc::new(InMemoryServiceRepository::new()),
            Arc::clone(&transport),
            Arc::new(DefaultClock),
        );
        Self {
            plane,
            transport,
            pending_services: Vec::new(),
            registered_services: Vec::new(),
            last_register_result: None,
            last_broadcast: None,
        }
    }
}

impl Default for DirectoryWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> DirectoryWorld {
    DirectoryWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Builds a [`RegisterServiceRequest`] from scenario text.
///
/// # Errors
///
/// Returns an error when the kind is not a known service kind.
pub fn build_request(
    name: &str,
    kind: &str,
    base_url: &str,
) -> Result<RegisterServiceRequest, eyre::Report> {
    let parsed = ServiceKind::try_from(kind).map_err(|err| eyre::eyre!("{err}"))?;
    Ok(RegisterServiceRequest::new(name, parsed, base_url))
}

/// Parses a service identifier from scenario text.
///
/// # Errors
///
/// Returns an error when the text yields no identifier.
pub fn service_id(raw: &str) -> Result<ServiceId, eyre::Report> {
    ServiceId::new(raw).map_err(|err| eyre::eyre!("{err}"))
}
