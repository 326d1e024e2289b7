//! Subscriber contract for the event bus.

use super::DomainEvent;
use thiserror::Error;
use tracing::info;

/// Error reported by a failing event handler.
///
/// The bus logs it and moves on; it never reaches the emitter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("event handler failed: {0}")]
pub struct EventHandlerError(pub String);

impl EventHandlerError {
    /// Creates a handler error with a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Receives events published on the bus.
///
/// Handlers are identified by `Arc` pointer: subscribing the same `Arc`
/// twice registers it once.
pub trait EventHandler: Send + Sync {
    /// Handles one event.
    ///
    /// # Errors
    ///
    /// Returns [`EventHandlerError`] when the handler cannot process the
    /// event. The error is logged by the bus and does not affect other
    /// handlers.
    fn handle(&self, event: &DomainEvent) -> Result<(), EventHandlerError>;
}

/// Handler that writes every event to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventHandler;

impl EventHandler for TracingEventHandler {
    fn handle(&self, event: &DomainEvent) -> Result<(), EventHandlerError> {
        info!(
            event_id = %event.id(),
            event_type = %event.event_type(),
            service_id = event.service_id().unwrap_or("-"),
            data = %event.data(),
            "domain event"
        );
        Ok(())
    }
}
