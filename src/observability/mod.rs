//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and store produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through the trace span of every request
//! - Metrics are off by default; recording without an exporter is free

pub mod logging;
pub mod metrics;
