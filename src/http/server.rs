//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers under the route prefix
//! - Wire up middleware (tracing, timeout, body limit, request ID, headers)
//! - Serve on a plain listener or with TLS, with graceful shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{Request, StatusCode},
    middleware,
    routing::{get, post},
    Router,
};
use axum_server::{tls_rustls::RustlsConfig, Handle};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::handlers::{self, Pages};
use crate::http::request::{UuidRequestId, X_REQUEST_ID};
use crate::http::response::{track_response, with_security_headers};
use crate::insights::{CredentialSource, EnvCredentials, InsightsProxy, MtlsTransport, UpstreamTransport};
use crate::upload::UploadStore;

/// Grace period for in-flight TLS connections on shutdown.
const TLS_DRAIN_SECS: u64 = 10;

/// Application state injected into handlers. Everything here is immutable.
#[derive(Clone)]
pub struct AppState {
    pub insights: InsightsProxy,
    pub uploads: UploadStore,
    pub pages: Arc<Pages>,
}

/// HTTP server hosting the gateway handlers.
pub struct GatewayServer {
    router: Router,
    config: GatewayConfig,
}

impl GatewayServer {
    /// Create a server reading credentials from the environment and
    /// calling upstream over mTLS.
    pub fn new(config: GatewayConfig) -> Self {
        let timeout = config.insights.timeout_secs.map(Duration::from_secs);
        Self::with_components(
            config,
            Arc::new(EnvCredentials),
            Arc::new(MtlsTransport::new(timeout)),
        )
    }

    /// Create a server with explicit credential source and transport.
    pub fn with_components(
        config: GatewayConfig,
        credentials: Arc<dyn CredentialSource>,
        transport: Arc<dyn UpstreamTransport>,
    ) -> Self {
        let state = AppState {
            insights: InsightsProxy::new(config.insights.endpoint.clone(), credentials, transport),
            uploads: UploadStore::new(&config.upload.directory),
            pages: Arc::new(Pages::new(&config.http.route_prefix)),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let api = Router::new()
            .route("/HttpTrigger", get(handlers::greet).post(handlers::greet))
            .route("/abn_insights", get(handlers::account_insights))
            .route("/abn_page", get(handlers::insights_page))
            .route("/upload_audio", post(handlers::upload_audio))
            .route("/audio_recorder", get(handlers::audio_recorder))
            .route("/health", get(handlers::health))
            .route_layer(middleware::from_fn(track_response))
            .with_state(state);

        let prefix = config.http.route_prefix.as_str();
        let mut router = if prefix.is_empty() {
            Router::new().merge(api)
        } else {
            Router::new().nest(prefix, api)
        };

        if config.security.enable_headers {
            router = with_security_headers(router);
        }

        router
            .layer(DefaultBodyLimit::max(config.security.max_body_size))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::GATEWAY_TIMEOUT,
                Duration::from_secs(config.timeouts.request_secs),
            ))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
                    .layer(
                        TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                            tracing::info_span!(
                                "request",
                                method = %request.method(),
                                path = %request.uri().path(),
                                request_id = crate::http::request::request_id(request),
                            )
                        }),
                    )
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID)),
            )
    }

    /// The assembled router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Run the server on a plain TCP listener until shutdown fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, prefix = %self.config.http.route_prefix, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run the server with TLS until shutdown fires.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        tracing::info!(address = %addr, prefix = %self.config.http.route_prefix, "HTTPS server starting");

        let handle = Handle::new();
        let drain = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            drain.graceful_shutdown(Some(Duration::from_secs(TLS_DRAIN_SECS)));
        });

        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}
