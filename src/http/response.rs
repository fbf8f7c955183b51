//! Response construction for the relay.
//!
//! Successful fetches become `text/calendar` responses carrying the upstream
//! body verbatim. Every failure maps to a plain-text body and a status code
//! through [`RelayError`].

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Content type of every successful relay response.
pub const CALENDAR_CONTENT_TYPE: &str = "text/calendar; charset=utf-8";

/// Body used for transport failures when details are hidden.
pub const SANITIZED_TRANSPORT_MESSAGE: &str = "upstream request failed";

/// A relay request that ended without a calendar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    /// No `url` query parameter, or an empty one.
    #[error("Missing URL parameter")]
    MissingUrl,

    /// The target host is not on the configured allow-list.
    #[error("Target host not allowed")]
    Forbidden,

    /// The upstream answered with a non-2xx status.
    #[error("Failed to fetch ICS: {reason}")]
    UpstreamStatus { status: StatusCode, reason: String },

    /// The upstream could not be reached or its body could not be read.
    #[error("Error fetching ICS: {0}")]
    Transport(String),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MissingUrl => StatusCode::BAD_REQUEST,
            RelayError::Forbidden => StatusCode::FORBIDDEN,
            RelayError::UpstreamStatus { status, .. } => *status,
            RelayError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Metrics label for this failure.
    pub fn outcome(&self) -> &'static str {
        match self {
            RelayError::MissingUrl => "missing_url",
            RelayError::Forbidden => "forbidden",
            RelayError::UpstreamStatus { .. } => "upstream_status",
            RelayError::Transport(_) => "transport",
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

/// Wrap an upstream body as a calendar response.
pub fn calendar_response(body: String) -> Response {
    (
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static(CALENDAR_CONTENT_TYPE),
        )],
        body,
    )
        .into_response()
}
