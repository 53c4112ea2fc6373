//! Mutual-TLS account insights proxy.
//!
//! # Data Flow
//! ```text
//! GET /abn_insights
//!     → identity gate (401)
//!     → credentials.rs (ConfigMissing → 500, no network)
//!     → transport.rs   (one mTLS GET, TransportError → 500)
//!     → proxy.rs       (200 → pretty JSON, other → upstream status)
//! ```

pub mod credentials;
pub mod error;
pub mod proxy;
pub mod transport;

pub use credentials::{CredentialBundle, CredentialSource, EnvCredentials, StaticCredentials};
pub use error::InsightsError;
pub use proxy::InsightsProxy;
pub use transport::{MtlsTransport, TransportError, UpstreamRequest, UpstreamResponse, UpstreamTransport};
