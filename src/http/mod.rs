//! HTTP hosting subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → request.rs (request ID)
//!     → server.rs (routing under the prefix, limits, timeout)
//!     → handlers
//!     → response.rs (status metrics, security headers)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, GatewayServer};
