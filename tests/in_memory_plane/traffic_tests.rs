//! Availability gate and broadcast selection tests.

use super::helpers::{Setup, setup};
use eyre::{bail, ensure};
use rstest::rstest;
use serde_json::json;
use switchboard::directory::domain::ServiceKind;
use switchboard::error::ErrorCode;
use switchboard::gateway::domain::{BroadcastOutcome, ProxyRequest};
use switchboard::transport::OutboundResponse;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn proxy_follows_health_transitions(setup: Setup) -> eyre::Result<()> {
    let service = setup
        .service("Search", ServiceKind::Api, "http://search:1", 200)
        .await?;
    setup
        .transport
        .respond("http://search:1/query", OutboundResponse::json(200, &json!([])))?;
    let request = ProxyRequest::get(service.id().clone(), "/query");

    match setup.plane.gateway().proxy(request.clone()).await {
        Err(err) if err.code() == ErrorCode::ServiceUnavailable => {}
        other => bail!("starting service should be refused, got {other:?}"),
    }

    setup.plane.health().check_service(service.id()).await?;
    let response = setup.plane.gateway().proxy(request.clone()).await?;
    ensure!(response.status == 200);

    setup
        .transport
        .respond("http://search:1/health", OutboundResponse::new(500))?;
    setup.plane.health().check_service(service.id()).await?;
    match setup.plane.gateway().proxy(request).await {
        Err(err) if err.code() == ErrorCode::ServiceUnavailable => Ok(()),
        other => bail!("unhealthy service should be refused, got {other:?}"),
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn broadcast_skips_stopping_and_other_kinds(setup: Setup) -> eyre::Result<()> {
    let first = setup
        .service("Fleet One", ServiceKind::MobileApp, "http://one:1", 200)
        .await?;
    let second = setup
        .service("Fleet Two", ServiceKind::MobileApp, "http://two:1", 429)
        .await?;
    let draining = setup
        .service("Fleet Three", ServiceKind::MobileApp, "http://three:1", 200)
        .await?;
    setup
        .service("Console", ServiceKind::WebApp, "http://console:1", 200)
        .await?;
    for base in ["http://one:1", "http://two:1", "http://three:1", "http://console:1"] {
        setup
            .transport
            .respond(&format!("{base}/broadcast"), OutboundResponse::new(204))?;
    }
    setup.plane.health().check_all().await?;
    setup.plane.directory().begin_shutdown(draining.id()).await?;

    let outcomes = setup
        .plane
        .gateway()
        .broadcast(ServiceKind::MobileApp, json!({ "version": "2.0" }))
        .await?;

    let ids: Vec<&str> = outcomes.keys().map(|id| id.as_str()).collect();
    ensure!(
        ids == vec![first.id().as_str(), second.id().as_str()],
        "unexpected targets {ids:?}"
    );
    ensure!(outcomes.values().all(BroadcastOutcome::is_delivered));
    Ok(())
}
