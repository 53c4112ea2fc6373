//! Upstream credentials and mTLS material.
//!
//! # Responsibilities
//! - Describe where credentials come from (`CredentialSource`)
//! - Read the four values fresh on every call
//! - Report exactly which values are missing

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use base64::{engine::general_purpose::STANDARD, Engine};

pub const CLIENT_ID_VAR: &str = "ABN_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "ABN_CLIENT_SECRET";
pub const CERTIFICATE_PATH_VAR: &str = "CERTIFICATE_PATH";
pub const KEY_PATH_VAR: &str = "KEY_PATH";

/// The variables a complete bundle needs, in reporting order.
pub const REQUIRED_VARS: [&str; 4] = [CLIENT_ID_VAR, CLIENT_SECRET_VAR, CERTIFICATE_PATH_VAR, KEY_PATH_VAR];

/// Credentials for one upstream call.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialBundle {
    pub client_id: String,
    pub client_secret: String,
    pub certificate_path: PathBuf,
    pub key_path: PathBuf,
}

impl CredentialBundle {
    /// `Authorization` header value: `Basic base64(id:secret)`.
    pub fn basic_authorization(&self) -> String {
        let pair = format!("{}:{}", self.client_id, self.client_secret);
        format!("Basic {}", STANDARD.encode(pair))
    }
}

impl fmt::Debug for CredentialBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialBundle")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("certificate_path", &self.certificate_path)
            .field("key_path", &self.key_path)
            .finish()
    }
}

/// Provider of credential values, queried per invocation.
pub trait CredentialSource: Send + Sync {
    /// Look up one named value. Empty strings count as missing.
    fn lookup(&self, name: &str) -> Option<String>;

    /// Assemble a bundle, or return the names of every missing value.
    fn bundle(&self) -> Result<CredentialBundle, Vec<&'static str>> {
        let mut values = Vec::with_capacity(REQUIRED_VARS.len());
        let mut missing = Vec::new();

        for name in REQUIRED_VARS {
            match self.lookup(name).filter(|v| !v.is_empty()) {
                Some(v) => values.push(v),
                None => missing.push(name),
            }
        }

        if !missing.is_empty() {
            return Err(missing);
        }

        let mut values = values.into_iter();
        let mut next = || values.next().unwrap_or_default();
        Ok(CredentialBundle {
            client_id: next(),
            client_secret: next(),
            certificate_path: PathBuf::from(next()),
            key_path: PathBuf::from(next()),
        })
    }
}

/// Reads credentials from the process environment on every lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl CredentialSource for EnvCredentials {
    fn lookup(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Fixed credential values, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    values: HashMap<String, String>,
}

impl StaticCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a complete set.
    pub fn complete(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        certificate_path: impl Into<String>,
        key_path: impl Into<String>,
    ) -> Self {
        Self::new()
            .with(CLIENT_ID_VAR, client_id)
            .with(CLIENT_SECRET_VAR, client_secret)
            .with(CERTIFICATE_PATH_VAR, certificate_path)
            .with(KEY_PATH_VAR, key_path)
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn without(mut self, name: &str) -> Self {
        self.values.remove(name);
        self
    }
}

impl CredentialSource for StaticCredentials {
    fn lookup(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}
