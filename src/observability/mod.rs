//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and the insights proxy produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID (x-request-id) is attached to every request span
//! - Metric calls are no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
