//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → ics::handler (relay the calendar)
//!     → response.rs (calendar body or mapped error)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use response::{RelayError, CALENDAR_CONTENT_TYPE};
pub use server::{AppState, HttpServer, RelayContext, ServerError};
