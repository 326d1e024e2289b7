//! Domain event values published on the event bus.

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// Closed set of notable occurrences announced by the control plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A new service entered the directory.
    ServiceRegistered,
    /// A service was removed from the directory.
    ServiceDeregistered,
    /// A service reported itself alive.
    ServiceHeartbeat,
    /// A service announced it is shutting down.
    ServiceStopping,
    /// An active check moved a service to a different status.
    HealthChanged,
    /// A command was sent to a service.
    CommandDispatched,
    /// A service accepted a command.
    CommandCompleted,
    /// A command could not be delivered or was rejected upstream.
    CommandFailed,
    /// A fan-out broadcast settled on every target.
    BroadcastCompleted,
}

impl EventType {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ServiceRegistered => "service_registered",
            Self::ServiceDeregistered => "service_deregistered",
            Self::ServiceHeartbeat => "service_heartbeat",
            Self::ServiceStopping => "service_stopping",
            Self::HealthChanged => "health_changed",
            Self::CommandDispatched => "command_dispatched",
            Self::CommandCompleted => "command_completed",
            Self::CommandFailed => "command_failed",
            Self::BroadcastCompleted => "broadcast_completed",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable record of something that happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainEvent {
    id: Uuid,
    event_type: EventType,
    #[serde(skip_serializing_if = "Option::is_none")]
    service_id: Option<String>,
    occurred_at: DateTime<Utc>,
    data: Value,
}

impl DomainEvent {
    /// Creates an event stamped with the clock's current time.
    #[must_use]
    pub fn new(event_type: EventType, data: Value, clock: &impl Clock) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type,
            service_id: None,
            occurred_at: clock.utc(),
            data,
        }
    }

    /// Associates the event with a service.
    #[must_use]
    pub fn for_service(mut self, service_id: impl Into<String>) -> Self {
        self.service_id = Some(service_id.into());
        self
    }

    /// Returns the unique event identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the event type.
    #[must_use]
    pub const fn event_type(&self) -> EventType {
        self.event_type
    }

    /// Returns the associated service identifier, if any.
    #[must_use]
    pub fn service_id(&self) -> Option<&str> {
        self.service_id.as_deref()
    }

    /// Returns when the event occurred.
    #[must_use]
    pub const fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    /// Returns the event payload.
    #[must_use]
    pub const fn data(&self) -> &Value {
        &self.data
    }
}
