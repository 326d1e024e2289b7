//! Given steps for service directory BDD scenarios.

use super::world::{DirectoryWorld, PendingService, build_request, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use switchboard::transport::OutboundResponse;

#[given(r#"a service "{name}" of type "{kind}" at "{url}""#)]
fn a_service(world: &mut DirectoryWorld, name: String, kind: String, url: String) {
    world.pending_services.push(PendingService {
        name,
        kind,
        base_url: url,
    });
}

#[given(r#"a registered service "{name}" of type "{kind}" at "{url}""#)]
fn a_registered_service(
    world: &mut DirectoryWorld,
    name: String,
    kind: String,
    url: String,
) -> Result<(), eyre::Report> {
    let request = build_request(&name, &kind, &url)?;
    let created = run_async(world.plane.directory().register(request))
        .wrap_err("register service for scenario")?;
    world.registered_services.push(created);
    Ok(())
}

#[given(r#""{endpoint}" answers with status {status:u16}"#)]
fn endpoint_answers(
    world: &mut DirectoryWorld,
    endpoint: String,
    status: u16,
) -> Result<(), eyre::Report> {
    world
        .transport
        .respond(&endpoint, OutboundResponse::new(status))
        .wrap_err("script endpoint reply")
}
