//! Calendar relay.
//!
//! # Data Flow
//! ```text
//! GET /api/fetch-ics?url=...
//!     → handler.rs (parameter check, outcome mapping)
//!     → policy.rs (allow-list)
//!     → upstream.rs (reqwest GET, read body as text)
//! ```

pub mod handler;
pub mod policy;
pub mod upstream;

pub use handler::{fetch_ics, first_param, URL_PARAM};
pub use policy::{HostAllowList, UpstreamPolicy};
pub use upstream::{FetchError, UpstreamClient};
