//! Outbound HTTPS transport with client certificate authentication.
//!
//! # Responsibilities
//! - Load the client certificate and private key (PEM) for each call
//! - Issue one GET with the Basic `Authorization` header
//! - Return status and raw body; interpretation belongs to the proxy
//!
//! # Design Decisions
//! - A fresh client per call: no pooling, no retry
//! - No timeout unless configured
//! - Transport is a trait so tests can count and script upstream calls

use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use axum::body::Bytes;
use futures_util::future::BoxFuture;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use thiserror::Error;

/// Everything needed to make the upstream call.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub url: String,
    pub authorization: String,
    pub certificate_path: PathBuf,
    pub key_path: PathBuf,
}

/// Raw upstream answer.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: Bytes,
}

/// Failures before a complete upstream response was received.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to read {path}: {source}")]
    ReadMaterial {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid client certificate material: {0}")]
    InvalidMaterial(String),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Connection-level failure from a transport not built on reqwest.
    #[error("connection failed: {0}")]
    Connect(String),
}

/// One-shot upstream GET.
pub trait UpstreamTransport: Send + Sync {
    fn get(&self, request: UpstreamRequest) -> BoxFuture<'_, Result<UpstreamResponse, TransportError>>;
}

/// reqwest + rustls transport presenting a client identity.
#[derive(Debug, Clone, Default)]
pub struct MtlsTransport {
    timeout: Option<Duration>,
}

impl MtlsTransport {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse, TransportError> {
        let identity = load_identity(&request.certificate_path, &request.key_path).await?;

        let mut builder = reqwest::Client::builder()
            .use_rustls_tls()
            .identity(identity)
            .pool_max_idle_per_host(0);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let response = client
            .get(&request.url)
            .header(AUTHORIZATION, &request.authorization)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Ok(UpstreamResponse { status, body })
    }
}

impl UpstreamTransport for MtlsTransport {
    fn get(&self, request: UpstreamRequest) -> BoxFuture<'_, Result<UpstreamResponse, TransportError>> {
        Box::pin(self.send(request))
    }
}

async fn read_material(path: &Path) -> Result<Vec<u8>, TransportError> {
    tokio::fs::read(path)
        .await
        .map_err(|source| TransportError::ReadMaterial {
            path: path.to_path_buf(),
            source,
        })
}

/// Combine certificate chain and key into a reqwest identity.
async fn load_identity(cert_path: &Path, key_path: &Path) -> Result<reqwest::Identity, TransportError> {
    let cert_pem = read_material(cert_path).await?;
    let key_pem = read_material(key_path).await?;

    check_material(&cert_pem, &key_pem)?;

    let mut combined = Vec::with_capacity(cert_pem.len() + key_pem.len() + 1);
    combined.extend_from_slice(&cert_pem);
    if !cert_pem.ends_with(b"\n") {
        combined.push(b'\n');
    }
    combined.extend_from_slice(&key_pem);

    Ok(reqwest::Identity::from_pem(&combined)?)
}

/// Fail early with a readable message when either file holds the wrong thing.
fn check_material(cert_pem: &[u8], key_pem: &[u8]) -> Result<(), TransportError> {
    let certs = rustls_pemfile::certs(&mut BufReader::new(cert_pem))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| TransportError::InvalidMaterial(format!("certificate: {}", e)))?;
    if certs.is_empty() {
        return Err(TransportError::InvalidMaterial(
            "no certificate found in certificate file".to_string(),
        ));
    }

    match rustls_pemfile::private_key(&mut BufReader::new(key_pem)) {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(TransportError::InvalidMaterial(
            "no private key found in key file".to_string(),
        )),
        Err(e) => Err(TransportError::InvalidMaterial(format!("private key: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_certificate_file() {
        let result = load_identity(Path::new("/nope/client.pem"), Path::new("/nope/client.key")).await;
        match result {
            Err(TransportError::ReadMaterial { path, .. }) => {
                assert_eq!(path, PathBuf::from("/nope/client.pem"));
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("identity loaded from missing files"),
        }
    }

    #[test]
    fn test_rejects_files_without_pem_blocks() {
        let err = check_material(b"just some text\n", b"more text\n").unwrap_err();
        assert!(err.to_string().contains("no certificate found"));
    }
}
