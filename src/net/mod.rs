//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! listener.rs (plain TCP bind)  ─┐
//!                                ├→ HTTP server (axum)
//! tls.rs (rustls via axum-server)┘
//! ```

pub mod listener;
pub mod tls;
