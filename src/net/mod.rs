//! Network listener support.
//!
//! The gateway binds either a plain tokio `TcpListener` or, when
//! `listener.tls` is configured, a rustls listener through axum-server.

pub mod tls;

pub use tls::load_tls_config;
