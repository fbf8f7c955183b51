//! Behavior of `GET /api/fetch-ics` against mock upstreams.

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use ics_relay::http::CALENDAR_CONTENT_TYPE;

mod common;
use common::{
    closed_port, encode, get, router, send, start_mock_upstream, start_programmable_upstream,
    test_config, MockResponse,
};

const CALENDAR: &str = "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nBEGIN:VEVENT\r\nUID:1@example.com\r\nSUMMARY:Standup\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";

fn fetch_uri(target: &str) -> String {
    format!("/api/fetch-ics?url={}", encode(target))
}

#[tokio::test]
async fn test_missing_url_is_bad_request() {
    let (status, headers, body) = get(router(test_config()), "/api/fetch-ics").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Missing URL parameter");
    assert!(headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
}

#[tokio::test]
async fn test_empty_url_is_bad_request() {
    let (status, _, body) = get(router(test_config()), "/api/fetch-ics?url=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Missing URL parameter");
}

#[tokio::test]
async fn test_repeated_url_uses_first_value() {
    let first = start_mock_upstream(MockResponse::ok("text/calendar", CALENDAR)).await;
    let second = start_mock_upstream(MockResponse::ok("text/calendar", "other")).await;
    let uri = format!(
        "/api/fetch-ics?url={}&url={}",
        encode(&first.url("/cal.ics")),
        encode(&second.url("/cal.ics"))
    );

    let (status, _, body) = get(router(test_config()), &uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, CALENDAR);
    assert_eq!(first.hits(), 1);
    assert_eq!(second.hits(), 0);
}

#[tokio::test]
async fn test_empty_first_url_is_bad_request() {
    let upstream = start_mock_upstream(MockResponse::ok("text/calendar", CALENDAR)).await;
    let uri = format!("/api/fetch-ics?url=&url={}", encode(&upstream.url("/cal.ics")));

    let (status, _, body) = get(router(test_config()), &uri).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Missing URL parameter");
    assert_eq!(upstream.hits(), 0);
}

#[tokio::test]
async fn test_relays_calendar_verbatim() {
    // Upstream content type is replaced, body is not touched.
    let upstream = start_mock_upstream(MockResponse::ok("text/plain", CALENDAR)).await;

    let (status, headers, body) =
        get(router(test_config()), &fetch_uri(&upstream.url("/cal.ics"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], CALENDAR_CONTENT_TYPE);
    assert_eq!(body, CALENDAR);
    assert_eq!(upstream.hits(), 1);
}

#[tokio::test]
async fn test_body_is_not_validated() {
    let upstream = start_mock_upstream(MockResponse::ok("text/calendar", "definitely not ics")).await;

    let (status, _, body) = get(router(test_config()), &fetch_uri(&upstream.url("/x"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "definitely not ics");
}

#[tokio::test]
async fn test_slow_upstream_is_relayed_by_default() {
    let upstream = start_programmable_upstream(|| async {
        tokio::time::sleep(Duration::from_millis(1500)).await;
        MockResponse::ok("text/calendar", CALENDAR)
    })
    .await;

    let (status, headers, body) =
        get(router(test_config()), &fetch_uri(&upstream.url("/slow.ics"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], CALENDAR_CONTENT_TYPE);
    assert_eq!(body, CALENDAR);
}

#[tokio::test]
async fn test_configured_request_timeout_applies() {
    let upstream = start_programmable_upstream(|| async {
        tokio::time::sleep(Duration::from_secs(3)).await;
        MockResponse::ok("text/calendar", CALENDAR)
    })
    .await;
    let mut config = test_config();
    config.timeouts.request_secs = Some(1);

    let (status, _, _) = get(router(config), &fetch_uri(&upstream.url("/slow.ics"))).await;

    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
}

#[tokio::test]
async fn test_upstream_not_found_is_mirrored() {
    let upstream = start_mock_upstream(MockResponse::status(404, "Not Found")).await;

    let (status, _, body) =
        get(router(test_config()), &fetch_uri(&upstream.url("/missing.ics"))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Not Found"), "body was {body:?}");
    assert_eq!(body, "Failed to fetch ICS: Not Found");
}

#[tokio::test]
async fn test_upstream_server_error_is_mirrored_without_retry() {
    let upstream = start_mock_upstream(MockResponse::status(503, "Service Unavailable")).await;

    let (status, _, body) = get(router(test_config()), &fetch_uri(&upstream.url("/cal.ics"))).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, "Failed to fetch ICS: Service Unavailable");
    assert_eq!(upstream.hits(), 1);
}

#[tokio::test]
async fn test_invalid_url_is_internal_error() {
    let (status, _, body) = get(router(test_config()), &fetch_uri("not a url")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = body
        .strip_prefix("Error fetching ICS: ")
        .unwrap_or_else(|| panic!("unexpected body {body:?}"));
    assert!(!detail.is_empty());
}

#[tokio::test]
async fn test_connection_refused_is_internal_error_with_message() {
    let target = format!("http://{}/cal.ics", closed_port().await);

    let (status, _, body) = get(router(test_config()), &fetch_uri(&target)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.starts_with("Error fetching ICS: "), "body was {body:?}");
    assert!(body.contains("error sending request"), "body was {body:?}");
}

#[tokio::test]
async fn test_transport_details_can_be_hidden() {
    let mut config = test_config();
    config.upstream.expose_transport_errors = false;
    let target = format!("http://{}/cal.ics", closed_port().await);

    let (status, _, body) = get(router(config), &fetch_uri(&target)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Error fetching ICS: upstream request failed");
}

#[tokio::test]
async fn test_allow_list_blocks_before_fetching() {
    let upstream = start_mock_upstream(MockResponse::ok("text/calendar", CALENDAR)).await;
    let mut config = test_config();
    config.upstream.allowed_hosts = vec!["calendar.example.com".into()];

    let (status, _, body) = get(router(config), &fetch_uri(&upstream.url("/cal.ics"))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, "Target host not allowed");
    assert_eq!(upstream.hits(), 0);
}

#[tokio::test]
async fn test_allow_list_permits_listed_host() {
    let upstream = start_mock_upstream(MockResponse::ok("text/calendar", CALENDAR)).await;
    let mut config = test_config();
    config.upstream.allowed_hosts = vec!["127.0.0.1".into()];

    let (status, _, body) = get(router(config), &fetch_uri(&upstream.url("/cal.ics"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, CALENDAR);
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let (_, headers, _) = get(router(test_config()), "/api/fetch-ics").await;
    let id = headers["x-request-id"].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok(), "generated id {id:?}");

    let request = Request::get("/health")
        .header("x-request-id", "client-chosen")
        .body(Body::empty())
        .unwrap();
    let (status, headers, body) = send(router(test_config()), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
    assert_eq!(headers["x-request-id"], "client-chosen");
}

#[tokio::test]
async fn test_only_get_is_routed() {
    let request = Request::post("/api/fetch-ics?url=x")
        .body(Body::empty())
        .unwrap();
    let (status, _, _) = send(router(test_config()), request).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
