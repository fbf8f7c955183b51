//! ICS relay and browser image helpers.
//!
//! - [`ics`]: `GET /api/fetch-ics?url=…` fetches a remote calendar and relays
//!   it as `text/calendar`.
//! - [`images`]: image reference normalization, preload hints and load
//!   detection for UI code.

pub mod config;
pub mod http;
pub mod ics;
pub mod images;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use config::schema::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
