//! Account insights proxy.
//!
//! # Data Flow
//! ```text
//! CredentialSource::bundle()          → ConfigMissing (no network)
//!     → UpstreamRequest (Basic auth + cert/key paths)
//!     → UpstreamTransport::get()      → Transport
//!     → status == 200 ? pretty JSON   : Upstream { status, body }
//! ```

use std::sync::Arc;
use std::time::Instant;

use axum::http::StatusCode;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::insights::credentials::CredentialSource;
use crate::insights::error::InsightsError;
use crate::insights::transport::{UpstreamRequest, UpstreamTransport};
use crate::observability::metrics;

/// Relays one insights call per invocation.
#[derive(Clone)]
pub struct InsightsProxy {
    endpoint: String,
    credentials: Arc<dyn CredentialSource>,
    transport: Arc<dyn UpstreamTransport>,
}

impl InsightsProxy {
    pub fn new(
        endpoint: impl Into<String>,
        credentials: Arc<dyn CredentialSource>,
        transport: Arc<dyn UpstreamTransport>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            credentials,
            transport,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch insights and return the pretty-printed JSON body.
    pub async fn fetch(&self) -> Result<String, InsightsError> {
        let bundle = self.credentials.bundle().map_err(InsightsError::ConfigMissing)?;

        let request = UpstreamRequest {
            url: self.endpoint.clone(),
            authorization: bundle.basic_authorization(),
            certificate_path: bundle.certificate_path,
            key_path: bundle.key_path,
        };

        let start = Instant::now();
        let response = match self.transport.get(request).await {
            Ok(r) => r,
            Err(e) => {
                metrics::record_upstream("transport_error", start);
                tracing::error!(endpoint = %self.endpoint, error = %e, "Error connecting to insights API");
                return Err(e.into());
            }
        };

        if response.status != 200 {
            metrics::record_upstream("upstream_error", start);
            let body = String::from_utf8_lossy(&response.body).into_owned();
            tracing::error!(
                endpoint = %self.endpoint,
                status = response.status,
                body = %body,
                "Insights API error"
            );
            let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::BAD_GATEWAY);
            return Err(InsightsError::Upstream { status, body });
        }

        let value: serde_json::Value = serde_json::from_slice(&response.body).map_err(|e| {
            metrics::record_upstream("invalid_body", start);
            tracing::error!(endpoint = %self.endpoint, error = %e, "Insights API returned malformed JSON");
            InsightsError::InvalidBody(e)
        })?;

        metrics::record_upstream("ok", start);
        Ok(to_pretty_json(&value)?)
    }
}

/// Serialise with a four-space indent.
fn to_pretty_json(value: &serde_json::Value) -> Result<String, serde_json::Error> {
    let mut out = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::credentials::{StaticCredentials, CLIENT_SECRET_VAR};
    use crate::insights::transport::{TransportError, UpstreamResponse};
    use axum::body::Bytes;
    use futures_util::future::BoxFuture;
    use std::sync::Mutex;

    struct Recorder {
        reply: fn() -> Result<UpstreamResponse, TransportError>,
        seen: Mutex<Vec<UpstreamRequest>>,
    }

    impl UpstreamTransport for Recorder {
        fn get(&self, request: UpstreamRequest) -> BoxFuture<'_, Result<UpstreamResponse, TransportError>> {
            self.seen.lock().unwrap().push(request);
            let reply = (self.reply)();
            Box::pin(async move { reply })
        }
    }

    fn proxy(credentials: StaticCredentials, reply: fn() -> Result<UpstreamResponse, TransportError>) -> (InsightsProxy, Arc<Recorder>) {
        let recorder = Arc::new(Recorder {
            reply,
            seen: Mutex::new(Vec::new()),
        });
        let proxy = InsightsProxy::new(
            "https://upstream.test/v2/account-insights",
            Arc::new(credentials),
            recorder.clone(),
        );
        (proxy, recorder)
    }

    fn full() -> StaticCredentials {
        StaticCredentials::complete("id", "secret", "/certs/c.pem", "/certs/c.key")
    }

    #[tokio::test]
    async fn test_builds_request_from_bundle() {
        let (proxy, recorder) = proxy(full(), || {
            Ok(UpstreamResponse { status: 200, body: Bytes::from_static(b"{\"accounts\":[]}") })
        });

        let body = proxy.fetch().await.unwrap();
        assert_eq!(body, "{\n    \"accounts\": []\n}");

        let seen = recorder.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].url, "https://upstream.test/v2/account-insights");
        assert_eq!(seen[0].authorization, "Basic aWQ6c2VjcmV0");
        assert_eq!(seen[0].certificate_path.to_str(), Some("/certs/c.pem"));
    }

    #[tokio::test]
    async fn test_keeps_upstream_key_order() {
        let (proxy, _) = proxy(full(), || {
            Ok(UpstreamResponse { status: 200, body: Bytes::from_static(br#"{"zeta":1,"alpha":2}"#) })
        });

        let body = proxy.fetch().await.unwrap();
        assert_eq!(body, "{\n    \"zeta\": 1,\n    \"alpha\": 2\n}");
    }

    #[tokio::test]
    async fn test_missing_secret_skips_call() {
        let (proxy, recorder) = proxy(full().without(CLIENT_SECRET_VAR), || {
            Ok(UpstreamResponse { status: 200, body: Bytes::new() })
        });

        let err = proxy.fetch().await.unwrap_err();
        assert!(matches!(err, InsightsError::ConfigMissing(ref m) if m == &vec![CLIENT_SECRET_VAR]));
        assert!(recorder.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_200_carries_status_and_body() {
        let (proxy, _) = proxy(full(), || {
            Ok(UpstreamResponse { status: 201, body: Bytes::from_static(b"created?") })
        });

        match proxy.fetch().await.unwrap_err() {
            InsightsError::Upstream { status, body } => {
                assert_eq!(status, StatusCode::CREATED);
                assert_eq!(body, "created?");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_200_body() {
        let (proxy, _) = proxy(full(), || {
            Ok(UpstreamResponse { status: 200, body: Bytes::from_static(b"<html>") })
        });
        assert!(matches!(proxy.fetch().await, Err(InsightsError::InvalidBody(_))));
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let (proxy, _) = proxy(full(), || Err(TransportError::Connect("refused".into())));
        assert!(matches!(proxy.fetch().await, Err(InsightsError::Transport(_))));
    }
}
