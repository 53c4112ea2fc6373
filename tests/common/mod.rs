//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Bytes;
use futures_util::future::BoxFuture;
use insights_gateway::config::GatewayConfig;
use insights_gateway::http::GatewayServer;
use insights_gateway::identity::{encode_principal, PRINCIPAL_HEADER};
use insights_gateway::insights::{
    CredentialSource, StaticCredentials, TransportError, UpstreamRequest, UpstreamResponse,
    UpstreamTransport,
};
use insights_gateway::lifecycle::Shutdown;
use tempfile::TempDir;
use tokio::net::TcpListener;

type Reply = Box<dyn Fn() -> Result<UpstreamResponse, TransportError> + Send + Sync>;

/// Scripted upstream that counts calls.
pub struct StubTransport {
    calls: AtomicUsize,
    reply: Reply,
}

#[allow(dead_code)]
impl StubTransport {
    pub fn new<F>(reply: F) -> Arc<Self>
    where
        F: Fn() -> Result<UpstreamResponse, TransportError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            reply: Box::new(reply),
        })
    }

    pub fn responding(status: u16, body: &'static str) -> Arc<Self> {
        Self::new(move || {
            Ok(UpstreamResponse {
                status,
                body: Bytes::from_static(body.as_bytes()),
            })
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl UpstreamTransport for StubTransport {
    fn get(&self, _request: UpstreamRequest) -> BoxFuture<'_, Result<UpstreamResponse, TransportError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = (self.reply)();
        Box::pin(async move { reply })
    }
}

#[allow(dead_code)]
pub fn full_credentials() -> StaticCredentials {
    StaticCredentials::complete("client-id", "client-secret", "/certs/client.pem", "/certs/client.key")
}

/// A gateway running on an ephemeral port with its own upload directory.
pub struct TestGateway {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    uploads: TempDir,
    shutdown: Shutdown,
}

#[allow(dead_code)]
impl TestGateway {
    pub async fn start(
        credentials: impl CredentialSource + 'static,
        transport: Arc<dyn UpstreamTransport>,
    ) -> Self {
        Self::start_with(GatewayConfig::default(), credentials, transport).await
    }

    pub async fn start_with(
        mut config: GatewayConfig,
        credentials: impl CredentialSource + 'static,
        transport: Arc<dyn UpstreamTransport>,
    ) -> Self {
        let uploads = tempfile::tempdir().unwrap();
        config.listener.bind_address = "127.0.0.1:0".into();
        config.upload.directory = uploads.path().to_string_lossy().into_owned();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let shutdown = Shutdown::new();
        let server = GatewayServer::with_components(config, Arc::new(credentials), transport);
        let server_shutdown = shutdown.subscribe();
        tokio::spawn(async move {
            let _ = server.run(listener, server_shutdown).await;
        });

        let client = reqwest::Client::builder().no_proxy().build().unwrap();

        Self {
            addr,
            client,
            uploads,
            shutdown,
        }
    }

    /// URL of a route under the default `/api` prefix.
    pub fn url(&self, route: &str) -> String {
        format!("http://{}/api/{}", self.addr, route)
    }

    /// URL of a path with no prefix applied.
    pub fn raw_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.uploads.path().to_path_buf()
    }

    pub fn get(&self, route: &str) -> reqwest::RequestBuilder {
        self.client.get(self.url(route))
    }

    pub fn post(&self, route: &str) -> reqwest::RequestBuilder {
        self.client.post(self.url(route))
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Attach a platform identity header.
#[allow(dead_code)]
pub fn signed_in(builder: reqwest::RequestBuilder, user: &str) -> reqwest::RequestBuilder {
    builder.header(PRINCIPAL_HEADER, encode_principal(user))
}
