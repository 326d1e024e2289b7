//! Event bus for announcing control-plane state changes.
//!
//! Registrations, health transitions, and command outcomes are published as
//! [`DomainEvent`] values. The [`EventBus`] fans each one out to subscribed
//! handlers and keeps a short rolling history; it is not a durable broker.

mod bus;
mod event;
mod handler;

pub use bus::{DEFAULT_EVENT_CAPACITY, DEFAULT_RECENT_LIMIT, EventBus};
pub use event::{DomainEvent, EventType};
pub use handler::{EventHandler, EventHandlerError, TracingEventHandler};
