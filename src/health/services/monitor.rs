//! Active health checking, aggregation, and the periodic sweep.

use crate::directory::{
    domain::{HealthCheckResult, Service, ServiceId, ServiceStatus, ServiceTransition},
    ports::{ServiceRepository, ServiceRepositoryError},
};
use crate::error::ErrorCode;
use crate::events::{DomainEvent, EventBus, EventType};
use crate::health::domain::{HealthSummary, classify_probe};
use crate::transport::{OutboundRequest, ServiceTransport, TransportError, send_with_deadline};
use futures_util::future::join_all;
use mockable::Clock;
use serde_json::json;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Shortest interval accepted by [`HealthMonitor::start_periodic`].
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// Service-level errors for health monitoring operations.
#[derive(Debug, Error)]
pub enum HealthMonitorError {
    /// No service exists with the given identifier.
    #[error("service {0} not found")]
    NotFound(ServiceId),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ServiceRepositoryError),
}

impl HealthMonitorError {
    /// Returns the stable error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Repository(ServiceRepositoryError::DuplicateService(_)) => ErrorCode::Conflict,
            Self::Repository(ServiceRepositoryError::Persistence(_)) => ErrorCode::Storage,
        }
    }
}

/// Result type for health monitor operations.
pub type HealthMonitorResult<T> = Result<T, HealthMonitorError>;

/// Determines service availability through active probes.
pub struct HealthMonitor<R, T, C>
where
    R: ServiceRepository + 'static,
    T: ServiceTransport + 'static,
    C: Clock + Send + Sync + 'static,
{
    repository: Arc<R>,
    transport: Arc<T>,
    events: Arc<EventBus>,
    clock: Arc<C>,
    timeout: Duration,
    sweeper: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl<R, T, C> Clone for HealthMonitor<R, T, C>
where
    R: ServiceRepository + 'static,
    T: ServiceTransport + 'static,
    C: Clock + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            transport: Arc::clone(&self.transport),
            events: Arc::clone(&self.events),
            clock: Arc::clone(&self.clock),
            timeout: self.timeout,
            sweeper: Arc::clone(&self.sweeper),
        }
    }
}

impl<R, T, C> HealthMonitor<R, T, C>
where
    R: ServiceRepository + 'static,
    T: ServiceTransport + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a monitor whose probes are bounded by `timeout`.
    #[must_use]
    pub fn new(
        repository: Arc<R>,
        transport: Arc<T>,
        events: Arc<EventBus>,
        clock: Arc<C>,
        timeout: Duration,
    ) -> Self {
        Self {
            repository,
            transport,
            events,
            clock,
            timeout,
            sweeper: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns the probe timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Actively checks one service and records the result on it.
    ///
    /// # Errors
    ///
    /// Returns [`HealthMonitorError::NotFound`] when no service has the
    /// identifier, or repository errors.
    pub async fn check_service(&self, id: &ServiceId) -> HealthMonitorResult<HealthCheckResult> {
        let service = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| HealthMonitorError::NotFound(id.clone()))?;

        let result = self.probe(&service).await;
        self.record(&service, result).await
    }

    /// Actively checks every registered service, then summarises.
    ///
    /// Probes run concurrently. A service whose check cannot be recorded is
    /// counted as unhealthy; no single service aborts the sweep.
    ///
    /// # Errors
    ///
    /// Returns [`HealthMonitorError::Repository`] when the directory cannot be
    /// listed.
    pub async fn check_all(&self) -> HealthMonitorResult<HealthSummary> {
        let services = self.repository.list_all().await?;
        let statuses = join_all(services.iter().map(|service| self.check_listed(service))).await;
        let summary = HealthSummary::from_statuses(statuses);
        debug!(
            total = summary.total,
            healthy = summary.healthy,
            degraded = summary.degraded,
            unhealthy = summary.unhealthy,
            overall = %summary.overall,
            "health sweep finished"
        );
        Ok(summary)
    }

    async fn check_listed(&self, service: &Service) -> ServiceStatus {
        let result = self.probe(service).await;
        match self.record(service, result).await {
            Ok(recorded) => recorded.status(),
            Err(HealthMonitorError::NotFound(_)) => {
                debug!(service_id = %service.id(), "service removed during sweep");
                ServiceStatus::Unknown
            }
            Err(err) => {
                warn!(service_id = %service.id(), error = %err, "failed to record health check");
                ServiceStatus::Unhealthy
            }
        }
    }

    /// Returns the cached result of the last check, if any.
    ///
    /// # Errors
    ///
    /// Returns [`HealthMonitorError::Repository`] when persistence lookup fails.
    pub async fn cached_result(
        &self,
        id: &ServiceId,
    ) -> HealthMonitorResult<Option<HealthCheckResult>> {
        let service = self.repository.find_by_id(id).await?;
        Ok(service.and_then(|found| found.last_health_check().cloned()))
    }

    /// Summarises cached statuses without probing anything.
    ///
    /// # Errors
    ///
    /// Returns [`HealthMonitorError::Repository`] when the directory cannot be
    /// listed.
    pub async fn aggregated(&self) -> HealthMonitorResult<HealthSummary> {
        let services = self.repository.list_all().await?;
        Ok(HealthSummary::from_statuses(
            services.iter().map(Service::status),
        ))
    }

    /// Returns the current status, or [`ServiceStatus::Unknown`] when the
    /// service is not registered.
    ///
    /// # Errors
    ///
    /// Returns [`HealthMonitorError::Repository`] when persistence lookup fails.
    pub async fn status_of(&self, id: &ServiceId) -> HealthMonitorResult<ServiceStatus> {
        let service = self.repository.find_by_id(id).await?;
        Ok(service.map_or(ServiceStatus::Unknown, |found| found.status()))
    }

    /// Starts sweeping every `interval`, replacing any running sweep.
    ///
    /// The first sweep runs one interval after the call. Sweep failures are
    /// logged and the timer keeps firing. Must be called from within a Tokio
    /// runtime.
    pub fn start_periodic(&self, interval: Duration) {
        let period = interval.max(MIN_SWEEP_INTERVAL);
        let monitor = self.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(err) = monitor.check_all().await {
                    warn!(error = %err, "periodic health sweep failed");
                }
            }
        });

        let previous = self
            .sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if let Some(stale) = previous {
            stale.abort();
        }
        info!(interval = ?period, "periodic health checks started");
    }

    /// Stops the periodic sweep, if one is running.
    pub fn stop_periodic(&self) {
        let current = self
            .sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = current {
            handle.abort();
            info!("periodic health checks stopped");
        }
    }

    /// Returns whether a periodic sweep is scheduled.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    async fn probe(&self, service: &Service) -> HealthCheckResult {
        let started = Instant::now();
        let outcome = match service.health_url() {
            Ok(url) => {
                send_with_deadline(&*self.transport, OutboundRequest::get(url), self.timeout).await
            }
            Err(err) => Err(TransportError::Request {
                url: service.base_url().to_string(),
                message: err.to_string(),
            }),
        };
        let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let (status, details) = classify_probe(&outcome);
        HealthCheckResult::new(status, self.clock.utc(), latency_ms, details)
    }

    async fn record(
        &self,
        service: &Service,
        result: HealthCheckResult,
    ) -> HealthMonitorResult<HealthCheckResult> {
        let current = result.status();
        let previous = self
            .repository
            .apply(service.id(), ServiceTransition::Checked(result.clone()))
            .await?
            .ok_or_else(|| HealthMonitorError::NotFound(service.id().clone()))?
            .previous();

        if previous == current {
            debug!(service_id = %service.id(), status = %current, "health unchanged");
        } else {
            info!(
                service_id = %service.id(),
                previous = %previous,
                current = %current,
                latency_ms = result.latency_ms(),
                "health changed"
            );
            self.events.emit(
                DomainEvent::new(
                    EventType::HealthChanged,
                    json!({
                        "previous": previous,
                        "current": current,
                        "latencyMs": result.latency_ms(),
                    }),
                    &*self.clock,
                )
                .for_service(service.id().as_str()),
            );
        }
        Ok(result)
    }
}
