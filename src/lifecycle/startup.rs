//! Startup orchestration.
//!
//! Order: config → logging → metrics → config watcher → server. Any failure
//! before the server starts is fatal.

use std::net::{AddrParseError, SocketAddr};
use std::path::Path;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::config::watcher::ConfigWatcher;
use crate::config::{load_config, ConfigError, RelayConfig};
use crate::http::{HttpServer, ServerError};
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals::spawn_signal_handler;
use crate::net::listener::{self, ListenerError};
use crate::observability::{logging, metrics};

/// Error type for startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to initialize logging: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
    #[error("Invalid metrics address: {0}")]
    MetricsAddress(#[from] AddrParseError),
    #[error("Failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
    #[error("Failed to watch config file: {0}")]
    Watcher(#[from] notify::Error),
    #[error(transparent)]
    Listener(#[from] ListenerError),
    #[error(transparent)]
    Server(#[from] ServerError),
}

/// Start the relay and run until a termination signal.
///
/// Without `config_path` the built-in defaults are used and hot reload is off.
pub async fn start(config_path: Option<&Path>) -> Result<(), StartupError> {
    let config = match config_path {
        Some(path) => load_config(path)?,
        None => RelayConfig::default(),
    };

    logging::init_logging(&config.observability)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "ics-relay starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        tls = config.listener.tls.is_some(),
        request_timeout_secs = ?config.timeouts.request_secs,
        allowed_hosts = config.upstream.allowed_hosts.len(),
        "Configuration loaded"
    );
    if config.upstream.allowed_hosts.is_empty() {
        tracing::warn!("upstream.allowed_hosts is empty, any URL will be fetched");
    }

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    // The watcher handle must outlive the server.
    let (_watcher, config_updates) = match config_path {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        None => (None, mpsc::unbounded_channel().1),
    };

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    spawn_signal_handler(shutdown);

    let server = HttpServer::new(config.clone())?;
    match &config.listener.tls {
        Some(tls) => server.run_tls(tls, config_updates, server_shutdown).await?,
        None => {
            let listener = listener::bind(&config.listener).await?;
            server.run(listener, config_updates, server_shutdown).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
