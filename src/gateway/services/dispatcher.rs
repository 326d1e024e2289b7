//! Timeout-bounded proxying, command dispatch, and fan-out broadcast.

use crate::directory::{
    domain::{Service, ServiceId, ServiceKind, ServiceStatus, ServiceTransition},
    ports::{ServiceRepository, ServiceRepositoryError},
};
use crate::error::ErrorCode;
use crate::events::{DomainEvent, EventBus, EventType};
use crate::gateway::domain::{
    BroadcastOutcome, ProxyRequest, ProxyResponse, ResponseBody, strip_hop_by_hop,
};
use crate::transport::{OutboundRequest, ServiceTransport, TransportError, send_with_deadline};
use futures_util::future::join_all;
use mockable::Clock;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Path prefix under which services receive commands.
pub const COMMAND_PATH_PREFIX: &str = "/commands";

/// Path at which services receive broadcast messages.
pub const BROADCAST_PATH: &str = "/broadcast";

/// Service-level errors for gateway operations.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request cannot be turned into an outbound call.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// No service exists with the given identifier.
    #[error("service {0} not found")]
    NotFound(ServiceId),
    /// The target exists but is not accepting traffic.
    #[error("service {id} is {status} and not accepting traffic")]
    ServiceUnavailable {
        /// Target service.
        id: ServiceId,
        /// Status at lookup time.
        status: ServiceStatus,
    },
    /// The outbound call exceeded its deadline.
    #[error("service {id} did not answer within {after:?}")]
    GatewayTimeout {
        /// Target service.
        id: ServiceId,
        /// Deadline that elapsed.
        after: Duration,
    },
    /// Any other transport failure, passed through unchanged.
    #[error(transparent)]
    Transport(TransportError),
    /// The service answered a command with status 400 or above.
    #[error("command '{command}' on service {id} failed with status {status}")]
    CommandDispatchFailed {
        /// Target service.
        id: ServiceId,
        /// Command name.
        command: String,
        /// Upstream status code.
        status: u16,
        /// Upstream body.
        body: Value,
    },
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ServiceRepositoryError),
}

impl GatewayError {
    /// Returns the stable error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidRequest(_) => ErrorCode::Validation,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::ServiceUnavailable { .. } => ErrorCode::ServiceUnavailable,
            Self::GatewayTimeout { .. } => ErrorCode::GatewayTimeout,
            Self::Transport(_) => ErrorCode::Transport,
            Self::CommandDispatchFailed { .. } => ErrorCode::CommandDispatchFailed,
            Self::Repository(ServiceRepositoryError::DuplicateService(_)) => ErrorCode::Conflict,
            Self::Repository(ServiceRepositoryError::Persistence(_)) => ErrorCode::Storage,
        }
    }
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Mediates all traffic destined for registered services.
pub struct Gateway<R, T, C>
where
    R: ServiceRepository,
    T: ServiceTransport,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    transport: Arc<T>,
    events: Arc<EventBus>,
    clock: Arc<C>,
    default_timeout: Duration,
}

impl<R, T, C> Clone for Gateway<R, T, C>
where
    R: ServiceRepository,
    T: ServiceTransport,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            transport: Arc::clone(&self.transport),
            events: Arc::clone(&self.events),
            clock: Arc::clone(&self.clock),
            default_timeout: self.default_timeout,
        }
    }
}

impl<R, T, C> Gateway<R, T, C>
where
    R: ServiceRepository,
    T: ServiceTransport,
    C: Clock + Send + Sync,
{
    /// Creates a gateway whose calls default to `default_timeout`.
    #[must_use]
    pub const fn new(
        repository: Arc<R>,
        transport: Arc<T>,
        events: Arc<EventBus>,
        clock: Arc<C>,
        default_timeout: Duration,
    ) -> Self {
        Self {
            repository,
            transport,
            events,
            clock,
            default_timeout,
        }
    }

    /// Returns the deadline applied when a request carries none.
    #[must_use]
    pub const fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Forwards a request to a service that is healthy or degraded.
    ///
    /// Any upstream answer, whatever its status, is a successful proxy and
    /// refreshes the service's last-seen time.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] for an unknown service,
    /// [`GatewayError::ServiceUnavailable`] when its status is not eligible,
    /// [`GatewayError::GatewayTimeout`] when the deadline elapses, and
    /// [`GatewayError::Transport`] for any other transport failure.
    pub async fn proxy(&self, request: ProxyRequest) -> GatewayResult<ProxyResponse> {
        let service = self
            .repository
            .find_by_id(&request.service_id)
            .await?
            .ok_or_else(|| GatewayError::NotFound(request.service_id.clone()))?;

        let status = service.status();
        if !status.is_available() {
            debug!(service_id = %service.id(), status = %status, "refusing traffic");
            return Err(GatewayError::ServiceUnavailable {
                id: service.id().clone(),
                status,
            });
        }

        self.forward(&service, request).await
    }

    async fn forward(
        &self,
        service: &Service,
        request: ProxyRequest,
    ) -> GatewayResult<ProxyResponse> {
        let ProxyRequest {
            method,
            path,
            mut headers,
            query,
            body,
            timeout,
            ..
        } = request;

        let url = service
            .base_url()
            .join(
                &path,
                query.iter().map(|(name, value)| (name.as_str(), value.as_str())),
            )
            .map_err(|err| GatewayError::InvalidRequest(format!("path '{path}': {err}")))?;
        let deadline = timeout.unwrap_or(self.default_timeout);
        strip_hop_by_hop(&mut headers);
        let outbound = OutboundRequest::new(method, url)
            .with_headers(headers)
            .with_body(body);

        let started = Instant::now();
        let response = send_with_deadline(&*self.transport, outbound, deadline)
            .await
            .map_err(|err| match err {
                TransportError::Timeout { after, .. } => GatewayError::GatewayTimeout {
                    id: service.id().clone(),
                    after,
                },
                other => GatewayError::Transport(other),
            })?;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        self.touch(service.id()).await;
        debug!(
            service_id = %service.id(),
            path = %path,
            status = response.status(),
            elapsed_ms,
            "proxied request"
        );

        Ok(ProxyResponse {
            status: response.status(),
            body: ResponseBody::decode(response.content_type(), response.body()),
            headers: response.headers().clone(),
            elapsed_ms,
        })
    }

    async fn touch(&self, id: &ServiceId) {
        let seen = ServiceTransition::Seen {
            at: self.clock.utc(),
        };
        match self.repository.apply(id, seen).await {
            Ok(Some(_)) => {}
            Ok(None) => debug!(service_id = %id, "service removed while proxying"),
            Err(err) => warn!(service_id = %id, error = %err, "failed to refresh last seen"),
        }
    }

    /// Sends a named command to a service.
    ///
    /// Posts `params` (an empty object when absent) to
    /// `/commands/{command}`. Emits `command_dispatched` before the call and
    /// `command_completed` or `command_failed` after it.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] for a malformed command name,
    /// [`GatewayError::CommandDispatchFailed`] when the service answers with
    /// status 400 or above, and any error [`Self::proxy`] returns.
    pub async fn dispatch_command(
        &self,
        id: &ServiceId,
        command: &str,
        params: Option<Value>,
    ) -> GatewayResult<ProxyResponse> {
        let name = validate_command(command)?;
        let payload = params.unwrap_or_else(|| json!({}));

        info!(service_id = %id, command = name, "dispatching command");
        self.publish(
            EventType::CommandDispatched,
            id,
            json!({ "command": name, "params": payload }),
        );

        let path = format!("{COMMAND_PATH_PREFIX}/{name}");
        let request = ProxyRequest::post(id.clone(), path, payload);
        match self.proxy(request).await {
            Ok(response) if response.is_success() => {
                self.publish(
                    EventType::CommandCompleted,
                    id,
                    json!({
                        "command": name,
                        "status": response.status,
                        "elapsedMs": response.elapsed_ms,
                    }),
                );
                Ok(response)
            }
            Ok(response) => {
                let body = response.body.into_value();
                warn!(
                    service_id = %id,
                    command = name,
                    status = response.status,
                    "command rejected"
                );
                self.publish(
                    EventType::CommandFailed,
                    id,
                    json!({
                        "command": name,
                        "code": ErrorCode::CommandDispatchFailed,
                        "status": response.status,
                        "body": body,
                    }),
                );
                Err(GatewayError::CommandDispatchFailed {
                    id: id.clone(),
                    command: name.to_owned(),
                    status: response.status,
                    body,
                })
            }
            Err(err) => {
                warn!(service_id = %id, command = name, error = %err, "command failed");
                self.publish(
                    EventType::CommandFailed,
                    id,
                    json!({
                        "command": name,
                        "code": err.code(),
                        "error": err.to_string(),
                    }),
                );
                Err(err)
            }
        }
    }

    /// Posts `message` to every available service of `kind`, concurrently.
    ///
    /// Returns once every leg has settled. A failing leg is recorded as
    /// [`BroadcastOutcome::Failed`] and never affects its siblings.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Repository`] only when the targets cannot be
    /// listed.
    pub async fn broadcast(
        &self,
        kind: ServiceKind,
        message: Value,
    ) -> GatewayResult<BTreeMap<ServiceId, BroadcastOutcome>> {
        let targets: Vec<ServiceId> = self
            .repository
            .list_by_kind(kind)
            .await?
            .into_iter()
            .filter(|service| service.status().is_available())
            .map(|service| service.id().clone())
            .collect();

        let legs = targets.into_iter().map(|target| {
            let request = ProxyRequest::post(target.clone(), BROADCAST_PATH, message.clone());
            async move {
                let outcome = match self.proxy(request).await {
                    Ok(response) => BroadcastOutcome::Delivered {
                        status: response.status,
                        body: response.body.into_value(),
                    },
                    Err(err) => {
                        debug!(service_id = %target, error = %err, "broadcast leg failed");
                        BroadcastOutcome::Failed {
                            code: err.code(),
                            message: err.to_string(),
                        }
                    }
                };
                (target, outcome)
            }
        });
        let outcomes: BTreeMap<ServiceId, BroadcastOutcome> =
            join_all(legs).await.into_iter().collect();

        let delivered = outcomes.values().filter(|outcome| outcome.is_delivered()).count();
        let failed = outcomes.len().saturating_sub(delivered);
        info!(kind = %kind, delivered, failed, "broadcast completed");
        self.events.emit(DomainEvent::new(
            EventType::BroadcastCompleted,
            json!({
                "type": kind,
                "targets": outcomes.len(),
                "delivered": delivered,
                "failed": failed,
            }),
            &*self.clock,
        ));
        Ok(outcomes)
    }

    fn publish(&self, event_type: EventType, id: &ServiceId, data: Value) {
        self.events
            .emit(DomainEvent::new(event_type, data, &*self.clock).for_service(id.as_str()));
    }
}

fn validate_command(command: &str) -> GatewayResult<&str> {
    let name = command.trim();
    let well_formed = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'));
    if well_formed {
        Ok(name)
    } else {
        Err(GatewayError::InvalidRequest(format!(
            "command name '{command}' must be non-empty and use only letters, digits, \
             '-', '_', '.', or ':'"
        )))
    }
}
