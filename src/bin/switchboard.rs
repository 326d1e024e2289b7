//! Runs the control plane until interrupted.
//!
//! Usage:
//!
//! ```text
//! switchboard [config-path]
//! ```
//!
//! The optional JSON document at `config-path` overrides any subset of the
//! control-plane settings, for example:
//!
//! ```json
//! {
//!   "health_check_interval_ms": 10000,
//!   "proxy_timeout_ms": 5000
//! }
//! ```
//!
//! Log verbosity follows `RUST_LOG` and defaults to `info`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use switchboard::config::ControlPlaneConfig;
use switchboard::control_plane::InMemoryControlPlane;
use switchboard::events::{EventHandler, TracingEventHandler};
use switchboard::transport::TransportError;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can stop the control plane from running.
#[derive(Debug, Error)]
enum LaunchError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("transport init failed: {0}")]
    Transport(#[from] TransportError),
    #[error("failed to wait for shutdown signal: {0}")]
    Signal(#[source] std::io::Error),
}

fn init_telemetry() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

fn load_config(path: Option<&Path>) -> Result<ControlPlaneConfig, LaunchError> {
    let Some(config_path) = path else {
        return Ok(ControlPlaneConfig::default());
    };
    let raw = std::fs::read_to_string(config_path).map_err(|source| LaunchError::ConfigRead {
        path: config_path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| LaunchError::ConfigParse {
        path: config_path.to_path_buf(),
        source,
    })
}

fn collect_args() -> Result<Option<PathBuf>, LaunchError> {
    let mut args = std::env::args_os().skip(1);
    let config_path = args.next().map(PathBuf::from);
    if args.next().is_some() {
        return Err(LaunchError::InvalidArgs(
            "usage: switchboard [config-path]".to_owned(),
        ));
    }
    Ok(config_path)
}

async fn run() -> Result<(), LaunchError> {
    let config_path = collect_args()?;
    let config = load_config(config_path.as_deref())?;
    let plane = InMemoryControlPlane::in_memory(config)?;

    let logger: Arc<dyn EventHandler> = Arc::new(TracingEventHandler);
    plane.events().subscribe_all(logger);
    plane.start();

    info!("waiting for shutdown signal");
    tokio::signal::ctrl_c().await.map_err(LaunchError::Signal)?;

    plane.shutdown();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    init_telemetry();
    run().await?;
    Ok(())
}
