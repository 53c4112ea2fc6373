//! Startup orchestration.
//!
//! # Order
//! 1. Metrics exporter (optional)
//! 2. Upload directory exists
//! 3. TLS material loads (optional)
//! 4. Listener binds, then traffic
//!
//! Any failure is fatal: the process exits before accepting requests.

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinError;

use crate::config::GatewayConfig;
use crate::http::GatewayServer;
use crate::lifecycle::{signals, Shutdown};
use crate::net::load_tls_config;
use crate::observability::metrics;
use crate::upload::UploadStore;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid address '{0}'")]
    Address(String),

    #[error("failed to prepare upload directory {path}: {source}")]
    UploadDirectory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load TLS material: {0}")]
    Tls(#[source] std::io::Error),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Bring the gateway up and serve until a termination signal.
pub async fn run(config: GatewayConfig) -> Result<(), StartupError> {
    let addr: SocketAddr = config
        .listener
        .bind_address
        .parse()
        .map_err(|_| StartupError::Address(config.listener.bind_address.clone()))?;

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(metrics_addr) => metrics::init_metrics(metrics_addr),
            Err(_) => {
                return Err(StartupError::Address(
                    config.observability.metrics_address.clone(),
                ))
            }
        }
    }

    UploadStore::new(&config.upload.directory)
        .ensure_directory()
        .await
        .map_err(|source| StartupError::UploadDirectory {
            path: config.upload.directory.clone(),
            source,
        })?;

    let tls = match &config.listener.tls {
        Some(tls) => Some(load_tls_config(tls).await.map_err(StartupError::Tls)?),
        None => None,
    };

    tracing::info!(
        bind_address = %addr,
        route_prefix = %config.http.route_prefix,
        upload_directory = %config.upload.directory,
        insights_endpoint = %config.insights.endpoint,
        tls = tls.is_some(),
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    let server = GatewayServer::new(config);
    let server_shutdown = shutdown.subscribe();

    let serving = async move {
        let result = match tls {
            Some(tls) => server.run_tls(addr, tls, server_shutdown).await,
            None => {
                let listener = TcpListener::bind(addr)
                    .await
                    .map_err(|source| StartupError::Bind { addr, source })?;
                server.run(listener, server_shutdown).await
            }
        };
        result.map_err(StartupError::from)
    };
    let mut serving = tokio::spawn(serving);

    tokio::select! {
        result = &mut serving => return joined(result),
        _ = signals::wait_for_signal() => {
            tracing::info!(tasks = shutdown.receiver_count(), "Shutdown signal received, draining");
            shutdown.trigger();
        }
    }

    joined(serving.await)
}

fn joined(result: Result<Result<(), StartupError>, JoinError>) -> Result<(), StartupError> {
    match result {
        Ok(result) => result,
        Err(e) => Err(StartupError::Serve(std::io::Error::other(e))),
    }
}
