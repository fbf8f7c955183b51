//! `GET /api/fetch-ics?url=<target>`
//!
//! Fetches a remote calendar and relays its body as `text/calendar`. Outcomes:
//! - `url` absent or empty → 400, no upstream call
//! - target host not allowed → 403, no upstream call
//! - upstream non-2xx → upstream status, `Failed to fetch ICS: <status text>`
//! - transport failure → 500, `Error fetching ICS: <message>`
//! - otherwise → 200 with the upstream body verbatim
//!
//! No retries, no caching.

use std::time::Instant;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Response,
};
use crate::http::request::request_id;
use crate::http::response::{calendar_response, RelayError, SANITIZED_TRANSPORT_MESSAGE};
use crate::http::server::AppState;
use crate::ics::upstream::{error_chain, status_text, FetchError};
use crate::observability::metrics;

/// Query parameter carrying the calendar URL.
pub const URL_PARAM: &str = "url";

/// First value of `name` in a decoded query string.
///
/// Repeated parameters are allowed; later values are ignored.
pub fn first_param<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

pub async fn fetch_ics(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, RelayError> {
    let request_id = request_id(&headers);
    let result = relay(&state, request_id, first_param(&params, URL_PARAM)).await;

    metrics::record_request(match &result {
        Ok(_) => "ok",
        Err(e) => e.outcome(),
    });
    result.map(calendar_response)
}

async fn relay(
    state: &AppState,
    request_id: &str,
    target: Option<&str>,
) -> Result<String, RelayError> {
    let target = target
        .filter(|t| !t.is_empty())
        .ok_or(RelayError::MissingUrl)?;

    let ctx = state.context();
    if !ctx.policy.allow.permits(target) {
        tracing::warn!(request_id = %request_id, target = %target, "Target host not allowed");
        return Err(RelayError::Forbidden);
    }

    tracing::debug!(request_id = %request_id, target = %target, "Fetching calendar");
    let start = Instant::now();
    let result = ctx.upstream.fetch_text(target).await;
    metrics::record_upstream(start);

    match result {
        Ok(body) => {
            tracing::info!(
                request_id = %request_id,
                target = %target,
                bytes = body.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Calendar relayed"
            );
            Ok(body)
        }
        Err(FetchError::Status { status }) => {
            tracing::info!(request_id = %request_id, target = %target, status = %status, "Upstream returned error status");
            Err(RelayError::UpstreamStatus {
                status,
                reason: status_text(status),
            })
        }
        Err(FetchError::Transport(e)) => {
            let detail = error_chain(&e);
            tracing::warn!(request_id = %request_id, target = %target, error = %detail, "Upstream request failed");
            Err(RelayError::Transport(if ctx.policy.expose_transport_errors {
                detail
            } else {
                SANITIZED_TRANSPORT_MESSAGE.to_string()
            }))
        }
    }
}
