//! Registration lifecycle tests.

use super::helpers::{Setup, setup};
use chrono::TimeDelta;
use eyre::ensure;
use rstest::rstest;
use std::time::Duration;
use switchboard::directory::{
    domain::{Capability, ServiceKind, ServiceStatus},
    services::RegisterServiceRequest,
};
use switchboard::events::EventType;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn service_moves_from_starting_to_checked_status(setup: Setup) -> eyre::Result<()> {
    let service = setup
        .service("Ledger", ServiceKind::Api, "http://ledger:1", 200)
        .await?;
    ensure!(service.status() == ServiceStatus::Starting);

    let summary = setup.plane.health().check_all().await?;

    ensure!(summary.total == 1 && summary.healthy == 1);
    let stored = setup.plane.directory().get(service.id()).await?;
    ensure!(stored.status() == ServiceStatus::Healthy, "got {}", stored.status());
    ensure!(stored.last_health_check().is_some());
    ensure!(stored.registered_at() == service.registered_at());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn heartbeat_keeps_service_out_of_stale_listing(setup: Setup) -> eyre::Result<()> {
    let quiet = setup
        .service("Quiet", ServiceKind::Agent, "http://quiet:1", 200)
        .await?;
    let chatty = setup
        .service("Chatty", ServiceKind::Agent, "http://chatty:1", 200)
        .await?;
    tokio::time::sleep(Duration::from_millis(60)).await;

    setup.plane.directory().heartbeat(chatty.id()).await?;
    let stale = setup
        .plane
        .directory()
        .list_stale(TimeDelta::milliseconds(40))
        .await?;

    let ids: Vec<&str> = stale.iter().map(|service| service.id().as_str()).collect();
    ensure!(ids == vec![quiet.id().as_str()], "unexpected stale set {ids:?}");
    ensure!(setup.plane.directory().count().await? == 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn shutdown_then_deregister_removes_service(setup: Setup) -> eyre::Result<()> {
    let service = setup
        .service("Worker", ServiceKind::Agent, "http://worker:1", 200)
        .await?;
    setup.plane.health().check_service(service.id()).await?;

    let stopping = setup.plane.directory().begin_shutdown(service.id()).await?;
    ensure!(stopping.status() == ServiceStatus::Stopping);
    ensure!(setup.plane.directory().deregister(service.id()).await?);
    ensure!(!setup.plane.directory().exists(service.id()).await?);
    ensure!(setup.plane.health().status_of(service.id()).await? == ServiceStatus::Unknown);

    let types: Vec<EventType> = setup
        .plane
        .recent_events(None)
        .iter()
        .rev()
        .map(|event| event.event_type())
        .collect();
    ensure!(
        types
            == vec![
                EventType::ServiceRegistered,
                EventType::HealthChanged,
                EventType::ServiceStopping,
                EventType::ServiceDeregistered,
            ],
        "unexpected event sequence {types:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn capability_lookup_spans_kinds(setup: Setup) -> eyre::Result<()> {
    for (name, kind) in [("Mobile", ServiceKind::MobileApp), ("Agent", ServiceKind::Agent)] {
        setup
            .plane
            .directory()
            .register(
                RegisterServiceRequest::new(name, kind, format!("http://{name}:1"))
                    .with_capability(Capability::new("notify", "")?),
            )
            .await?;
    }

    let notifiers = setup.plane.directory().find_by_capability("notify").await?;
    ensure!(notifiers.len() == 2, "found {}", notifiers.len());
    Ok(())
}
