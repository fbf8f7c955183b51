//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the relay and health handlers
//! - Wire up middleware (request ID, tracing, optional timeout)
//! - Serve over plain TCP or TLS with graceful shutdown
//! - Apply hot-reloaded upstream settings

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{http::Request, routing::get, Router};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{RelayConfig, TlsConfig};
use crate::http::request::{request_id, MakeRequestUuid, X_REQUEST_ID};
use crate::ics::handler::fetch_ics;
use crate::ics::policy::UpstreamPolicy;
use crate::ics::upstream::UpstreamClient;
use crate::lifecycle::shutdown;
use crate::net::listener::{bind_address, ListenerError};
use crate::net::tls::load_tls_config;

/// Path of the calendar relay endpoint.
pub const FETCH_ICS_PATH: &str = "/api/fetch-ics";
/// Path of the liveness endpoint.
pub const HEALTH_PATH: &str = "/health";

const TLS_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Error type for server startup and serving.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),
    #[error(transparent)]
    Listener(#[from] ListenerError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything a relay request needs, rebuilt as a unit on config reload.
#[derive(Debug)]
pub struct RelayContext {
    pub upstream: UpstreamClient,
    pub policy: UpstreamPolicy,
}

impl RelayContext {
    pub fn from_config(config: &RelayConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            upstream: UpstreamClient::from_config(&config.upstream)?,
            policy: UpstreamPolicy::from(&config.upstream),
        })
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<ArcSwap<RelayContext>>,
}

impl AppState {
    pub fn new(context: RelayContext) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(context)),
        }
    }

    /// Snapshot of the current context; unaffected by later reloads.
    pub fn context(&self) -> Arc<RelayContext> {
        self.inner.load_full()
    }

    /// Replace the context for all subsequent requests.
    pub fn replace(&self, context: RelayContext) {
        self.inner.store(Arc::new(context));
    }
}

/// HTTP server for the ICS relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> Result<Self, ServerError> {
        let state = AppState::new(RelayContext::from_config(&config)?);
        let router = Self::build_router(&config, state.clone());
        Ok(Self {
            router,
            config,
            state,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        let router = Router::new()
            .route(FETCH_ICS_PATH, get(fetch_ics))
            .route(HEALTH_PATH, get(health))
            .with_state(state);

        let router = match config.timeouts.request_secs {
            Some(secs) => router.layer(TimeoutLayer::new(Duration::from_secs(secs))),
            None => router,
        };

        router
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "request",
                        request_id = %request_id(request.headers()),
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                }),
            )
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
    }

    /// The fully layered router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Serve plain HTTP on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        config_updates: mpsc::UnboundedReceiver<RelayConfig>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        spawn_reloader(self.state.clone(), config_updates);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Serve HTTPS on the configured bind address until `shutdown` fires.
    pub async fn run_tls(
        self,
        tls: &TlsConfig,
        config_updates: mpsc::UnboundedReceiver<RelayConfig>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = bind_address(&self.config.listener)?;
        let rustls = load_tls_config(tls).await?;
        tracing::info!(address = %addr, "HTTPS server starting");

        spawn_reloader(self.state.clone(), config_updates);

        let handle = axum_server::Handle::new();
        let drain = handle.clone();
        tokio::spawn(async move {
            shutdown::wait(shutdown).await;
            drain.graceful_shutdown(Some(TLS_DRAIN_TIMEOUT));
        });

        axum_server::bind_rustls(addr, rustls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}

/// Apply upstream settings from reloaded configs until the sender is dropped.
fn spawn_reloader(state: AppState, mut updates: mpsc::UnboundedReceiver<RelayConfig>) {
    tokio::spawn(async move {
        while let Some(config) = updates.recv().await {
            match RelayContext::from_config(&config) {
                Ok(context) => {
                    state.replace(context);
                    tracing::info!(
                        allowed_hosts = config.upstream.allowed_hosts.len(),
                        expose_transport_errors = config.upstream.expose_transport_errors,
                        "Upstream settings reloaded"
                    );
                }
                Err(e) => {
                    tracing::error!(error = %e, "Rejected reloaded upstream settings, keeping current");
                }
            }
        }
    });
}

async fn health() -> &'static str {
    "ok"
}
