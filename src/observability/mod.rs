//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and background tasks produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters, histograms via `metrics`)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! The request ID set by the HTTP layer is attached to every request span.

pub mod logging;
pub mod metrics;
