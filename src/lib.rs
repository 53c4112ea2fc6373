//! Identity-gated HTTP handlers: a greeting, an mTLS account insights
//! proxy, two control pages and an audio upload sink.

pub mod config;
pub mod handlers;
pub mod http;
pub mod identity;
pub mod insights;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod upload;

pub use config::GatewayConfig;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
