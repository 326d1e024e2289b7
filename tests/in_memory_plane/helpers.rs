//! Shared helpers for in-memory control plane integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use switchboard::config::ControlPlaneConfig;
use switchboard::control_plane::ControlPlane;
use switchboard::directory::{
    adapters::InMemoryServiceRepository,
    domain::{Service, ServiceKind},
    services::RegisterServiceRequest,
};
use switchboard::transport::{OutboundResponse, adapters::InMemoryServiceTransport};

/// Control plane type used by the integration tests.
pub type TestPlane =
    ControlPlane<InMemoryServiceRepository, InMemoryServiceTransport, DefaultClock>;

/// A control plane together with the scripted transport it talks through.
pub struct Setup {
    /// The control plane under test.
    pub plane: TestPlane,
    /// Scripted transport shared with the plane.
    pub transport: Arc<InMemoryServiceTransport>,
}

impl Setup {
    /// Registers a service and scripts its health endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error when registration or scripting fails.
    pub async fn service(
        &self,
        name: &str,
        kind: ServiceKind,
        base_url: &str,
        health_status: u16,
    ) -> eyre::Result<Service> {
        self.transport.respond(
            &format!("{base_url}/health"),
            OutboundResponse::new(health_status),
        )?;
        let service = self
            .plane
            .directory()
            .register(RegisterServiceRequest::new(name, kind, base_url))
            .await?;
        Ok(service)
    }
}

/// Provides a control plane over in-memory storage and a scripted transport.
#[fixture]
pub fn setup() -> Setup {
    let transport = Arc::new(InMemoryServiceTransport::new());
    let plane = ControlPlane::new(
        ControlPlaneConfig::fast(),
        Arc::new(InMemoryServiceRepository::new()),
        Arc::clone(&transport),
        Arc::new(DefaultClock),
    );
    Setup { plane, transport }
}
