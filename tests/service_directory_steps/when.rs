//! When steps for service directory BDD scenarios.

use super::world::{DirectoryWorld, build_request, run_async, service_id};
use rstest_bdd_macros::when;
use serde_json::json;
use switchboard::directory::domain::ServiceKind;

#[when("the services are registered")]
fn register_pending(world: &mut DirectoryWorld) -> Result<(), eyre::Report> {
    for pending in &world.pending_services {
        let request = build_request(&pending.name, &pending.kind, &pending.base_url)?;
        let created = run_async(world.plane.directory().register(request))
            .map_err(|err| eyre::eyre!("unexpected registration failure: {err}"))?;
        world.registered_services.push(created);
    }
    Ok(())
}

#[when(r#"a service named "{name}" is registered at "{url}""#)]
fn register_named(
    world: &mut DirectoryWorld,
    name: String,
    url: String,
) -> Result<(), eyre::Report> {
    let request = build_request(&name, "agent", &url)?;
    world.last_register_result = Some(run_async(world.plane.directory().register(request)));
    Ok(())
}

#[when(r#"the health of "{id}" is checked"#)]
fn check_one(world: &mut DirectoryWorld, id: String) -> Result<(), eyre::Report> {
    let target = service_id(&id)?;
    run_async(world.plane.health().check_service(&target))
        .map_err(|err| eyre::eyre!("health check failed: {err}"))?;
    Ok(())
}

#[when("every service is health checked")]
fn check_every(world: &mut DirectoryWorld) -> Result<(), eyre::Report> {
    run_async(world.plane.health().check_all())
        .map_err(|err| eyre::eyre!("health sweep failed: {err}"))?;
    Ok(())
}

#[when(r#"a broadcast is sent to "{kind}" services"#)]
fn broadcast_to(world: &mut DirectoryWorld, kind: String) -> Result<(), eyre::Report> {
    let parsed = ServiceKind::try_from(kind.as_str()).map_err(|err| eyre::eyre!("{err}"))?;
    let outcomes = run_async(
        world
            .plane
            .gateway()
            .broadcast(parsed, json!({ "notice": "maintenance" })),
    )
    .map_err(|err| eyre::eyre!("broadcast failed: {err}"))?;
    world.last_broadcast = Some(outcomes);
    Ok(())
}
