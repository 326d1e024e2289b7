//! Bounded event history and subscriber isolation tests.

use super::helpers::{Setup, setup};
use eyre::ensure;
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::json;
use std::sync::{Arc, Mutex};
use switchboard::directory::domain::ServiceKind;
use switchboard::events::{DomainEvent, EventBus, EventHandler, EventHandlerError, EventType};

struct Recorder {
    seen: Mutex<Vec<EventType>>,
}

impl EventHandler for Recorder {
    fn handle(&self, event: &DomainEvent) -> Result<(), EventHandlerError> {
        self.seen
            .lock()
            .map_err(|err| EventHandlerError::new(err.to_string()))?
            .push(event.event_type());
        Ok(())
    }
}

struct Exploder;

impl EventHandler for Exploder {
    fn handle(&self, _event: &DomainEvent) -> Result<(), EventHandlerError> {
        Err(EventHandlerError::new("boom"))
    }
}

struct Panicker;

impl EventHandler for Panicker {
    fn handle(&self, _event: &DomainEvent) -> Result<(), EventHandlerError> {
        std::panic::panic_any("subscriber bug")
    }
}

#[rstest]
fn history_keeps_the_newest_hundred() -> eyre::Result<()> {
    let bus = EventBus::default();
    for sequence in 0..150 {
        bus.emit(DomainEvent::new(
            EventType::ServiceHeartbeat,
            json!({ "sequence": sequence }),
            &DefaultClock,
        ));
    }

    let all = bus.recent_events(500);
    ensure!(all.len() == 100, "kept {}", all.len());
    ensure!(all.first().map(|event| event.data().clone()) == Some(json!({ "sequence": 149 })));
    ensure!(all.last().map(|event| event.data().clone()) == Some(json!({ "sequence": 50 })));
    ensure!(bus.recent_events(500).len() == 100, "reads must not drain history");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failing_subscriber_does_not_block_others(setup: Setup) -> eyre::Result<()> {
    let recorder = Arc::new(Recorder {
        seen: Mutex::new(Vec::new()),
    });
    let exploder: Arc<dyn EventHandler> = Arc::new(Exploder);
    let recording: Arc<dyn EventHandler> = Arc::clone(&recorder) as Arc<dyn EventHandler>;
    let events = setup.plane.events();
    ensure!(events.subscribe(EventType::ServiceRegistered, exploder));
    ensure!(events.subscribe_all(Arc::clone(&recording)));
    ensure!(!events.subscribe_all(recording));

    setup
        .service("Observed", ServiceKind::Agent, "http://observed:1", 200)
        .await?;
    setup.plane.health().check_all().await?;

    let seen = recorder
        .seen
        .lock()
        .map_err(|err| eyre::eyre!("recorder lock poisoned: {err}"))?
        .clone();
    ensure!(
        seen == vec![EventType::ServiceRegistered, EventType::HealthChanged],
        "unexpected deliveries {seen:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn panicking_subscriber_leaves_operations_intact(setup: Setup) -> eyre::Result<()> {
    let events = setup.plane.events();
    ensure!(events.subscribe_all(Arc::new(Panicker)));

    let service = setup
        .service("Sturdy", ServiceKind::Agent, "http://sturdy:1", 200)
        .await?;
    setup.plane.directory().heartbeat(service.id()).await?;

    ensure!(setup.plane.directory().count().await? == 1);
    let kinds: Vec<EventType> = setup
        .plane
        .recent_events(None)
        .iter()
        .map(DomainEvent::event_type)
        .collect();
    ensure!(
        kinds == vec![EventType::ServiceHeartbeat, EventType::ServiceRegistered],
        "unexpected history {kinds:?}"
    );
    Ok(())
}
