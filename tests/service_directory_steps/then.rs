//! Then steps for service directory BDD scenarios.

use super::world::{DirectoryWorld, run_async, service_id};
use rstest_bdd_macros::then;
use switchboard::directory::{domain::ServiceKind, services::DirectoryError};
use switchboard::gateway::domain::{BroadcastOutcome, ProxyRequest};

#[then(r#"listing "{kind}" services returns {count:usize} entries"#)]
fn listing_returns_count(
    world: &DirectoryWorld,
    kind: String,
    count: usize,
) -> Result<(), eyre::Report> {
    let parsed = ServiceKind::try_from(kind.as_str()).map_err(|err| eyre::eyre!("{err}"))?;
    let listed = run_async(world.plane.directory().list(Some(parsed)))
        .map_err(|err| eyre::eyre!("list failed: {err}"))?;
    if listed.len() != count {
        return Err(eyre::eyre!(
            "expected {count} services, found {}",
            listed.len()
        ));
    }
    Ok(())
}

#[then(r#"the service "{id}" can be found"#)]
fn service_found(world: &DirectoryWorld, id: String) -> Result<(), eyre::Report> {
    let target = service_id(&id)?;
    let found = run_async(world.plane.directory().find(&target))
        .map_err(|err| eyre::eyre!("find failed: {err}"))?;
    if found.is_none() {
        return Err(eyre::eyre!("expected service '{id}' to exist"));
    }
    Ok(())
}

#[then("registration fails with a conflict error")]
fn registration_conflicts(world: &DirectoryWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_register_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing registration result in scenario world"))?;
    if !matches!(result, Err(DirectoryError::Conflict { .. })) {
        return Err(eyre::eyre!("expected conflict error, got {result:?}"));
    }
    Ok(())
}

#[then(r#"the service "{id}" is "{status}""#)]
fn service_has_status(
    world: &DirectoryWorld,
    id: String,
    status: String,
) -> Result<(), eyre::Report> {
    let target = service_id(&id)?;
    let current = run_async(world.plane.health().status_of(&target))
        .map_err(|err| eyre::eyre!("status lookup failed: {err}"))?;
    if current.as_str() != status {
        return Err(eyre::eyre!("expected '{id}' to be {status}, found {current}"));
    }
    Ok(())
}

#[then(r#"proxying to "{id}" fails with "{code}""#)]
fn proxy_fails_with(world: &DirectoryWorld, id: String, code: String) -> Result<(), eyre::Report> {
    let target = service_id(&id)?;
    let result = run_async(world.plane.gateway().proxy(ProxyRequest::get(target, "/")));
    match result {
        Err(err) if err.code().as_str() == code => Ok(()),
        Err(err) => Err(eyre::eyre!("expected {code}, got {}: {err}", err.code())),
        Ok(response) => Err(eyre::eyre!(
            "expected {code}, but proxy answered {}",
            response.status
        )),
    }
}

#[then(r#"the broadcast reached "{id}""#)]
fn broadcast_reached(world: &DirectoryWorld, id: String) -> Result<(), eyre::Report> {
    let target = service_id(&id)?;
    let outcomes = world
        .last_broadcast
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no broadcast in scenario world"))?;
    match outcomes.get(&target) {
        Some(BroadcastOutcome::Delivered { .. }) => Ok(()),
        other => Err(eyre::eyre!("expected delivery to '{id}', got {other:?}")),
    }
}

#[then(r#"the broadcast to "{id}" failed with "{code}""#)]
fn broadcast_failed(world: &DirectoryWorld, id: String, code: String) -> Result<(), eyre::Report> {
    let target = service_id(&id)?;
    let outcomes = world
        .last_broadcast
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no broadcast in scenario world"))?;
    match outcomes.get(&target) {
        Some(BroadcastOutcome::Failed { code: actual, .. }) if actual.as_str() == code => Ok(()),
        other => Err(eyre::eyre!("expected {code} failure for '{id}', got {other:?}")),
    }
}
