//! In-process event fan-out with a bounded rolling history.

use super::{DomainEvent, EventHandler, EventType};
use std::any::Any;
use std::collections::{HashMap, VecDeque};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, warn};

/// Default history capacity.
pub const DEFAULT_EVENT_CAPACITY: usize = 100;

/// Default number of events returned by [`EventBus::recent_events`] callers
/// that do not specify a limit.
pub const DEFAULT_RECENT_LIMIT: usize = 50;

#[derive(Default)]
struct HandlerRegistry {
    by_type: HashMap<EventType, Vec<Arc<dyn EventHandler>>>,
    all: Vec<Arc<dyn EventHandler>>,
}

fn insert_unique(
    handlers: &mut Vec<Arc<dyn EventHandler>>,
    handler: Arc<dyn EventHandler>,
) -> bool {
    if handlers.iter().any(|existing| Arc::ptr_eq(existing, &handler)) {
        return false;
    }
    handlers.push(handler);
    true
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

fn remove_handler(
    handlers: &mut Vec<Arc<dyn EventHandler>>,
    handler: &Arc<dyn EventHandler>,
) -> bool {
    let before = handlers.len();
    handlers.retain(|existing| !Arc::ptr_eq(existing, handler));
    handlers.len() != before
}

/// Publishes domain events to subscribers and keeps the most recent ones.
///
/// Handlers run synchronously inside [`EventBus::emit`], type-specific ones
/// first and all-event ones second, each group in subscription order.
pub struct EventBus {
    capacity: usize,
    history: RwLock<VecDeque<DomainEvent>>,
    handlers: RwLock<HandlerRegistry>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl EventBus {
    /// Creates a bus retaining at most `capacity` events (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let bounded = capacity.max(1);
        Self {
            capacity: bounded,
            history: RwLock::new(VecDeque::with_capacity(bounded)),
            handlers: RwLock::new(HandlerRegistry::default()),
        }
    }

    /// Returns the history capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records an event and notifies its subscribers.
    ///
    /// Handler failures are logged and never propagate.
    pub fn emit(&self, event: DomainEvent) {
        {
            let mut history = self.history.write().unwrap_or_else(PoisonError::into_inner);
            history.push_front(event.clone());
            history.truncate(self.capacity);
        }

        // Snapshot the handler lists so handlers may (un)subscribe while running.
        let (typed, all) = {
            let registry = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
            (
                registry
                    .by_type
                    .get(&event.event_type())
                    .cloned()
                    .unwrap_or_default(),
                registry.all.clone(),
            )
        };

        debug!(
            event_type = %event.event_type(),
            handlers = typed.len() + all.len(),
            "emitting event"
        );
        for handler in typed.iter().chain(all.iter()) {
            match panic::catch_unwind(AssertUnwindSafe(|| handler.handle(&event))) {
                Ok(Ok(())) => {}
                Ok(Err(err)) => warn!(
                    event_id = %event.id(),
                    event_type = %event.event_type(),
                    error = %err,
                    "event handler failed"
                ),
                Err(payload) => warn!(
                    event_id = %event.id(),
                    event_type = %event.event_type(),
                    panic = panic_message(payload.as_ref()),
                    "event handler panicked"
                ),
            }
        }
    }

    /// Subscribes a handler to one event type.
    ///
    /// Returns `false` when the same handler is already subscribed to it.
    pub fn subscribe(&self, event_type: EventType, handler: Arc<dyn EventHandler>) -> bool {
        let mut registry = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        insert_unique(registry.by_type.entry(event_type).or_default(), handler)
    }

    /// Removes a handler from one event type.
    ///
    /// Returns whether the handler was subscribed.
    pub fn unsubscribe(&self, event_type: EventType, handler: &Arc<dyn EventHandler>) -> bool {
        let mut registry = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        registry
            .by_type
            .get_mut(&event_type)
            .is_some_and(|handlers| remove_handler(handlers, handler))
    }

    /// Subscribes a handler to every event.
    ///
    /// Returns `false` when the same handler is already subscribed.
    pub fn subscribe_all(&self, handler: Arc<dyn EventHandler>) -> bool {
        let mut registry = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        insert_unique(&mut registry.all, handler)
    }

    /// Removes an all-event handler.
    ///
    /// Returns whether the handler was subscribed.
    pub fn unsubscribe_all(&self, handler: &Arc<dyn EventHandler>) -> bool {
        let mut registry = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        remove_handler(&mut registry.all, handler)
    }

    /// Returns the number of handlers subscribed to one event type.
    #[must_use]
    pub fn handler_count(&self, event_type: EventType) -> usize {
        let registry = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
        registry.by_type.get(&event_type).map_or(0, Vec::len)
    }

    /// Returns up to `limit` most recent events, newest first.
    ///
    /// The limit is capped at the bus capacity. History is not modified.
    #[must_use]
    pub fn recent_events(&self, limit: usize) -> Vec<DomainEvent> {
        let history = self.history.read().unwrap_or_else(PoisonError::into_inner);
        history
            .iter()
            .take(limit.min(self.capacity))
            .cloned()
            .collect()
    }
}
