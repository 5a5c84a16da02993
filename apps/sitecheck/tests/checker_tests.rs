//! HttpChecker and Prober against a local mock server

use std::sync::Arc;
use std::time::Duration;

use sitecheck::monitoring::{Checker, HttpChecker, ProbeError, Prober, Target};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USER_AGENT: &str = "sitecheck-test/1.0";

fn checker(timeout: Duration) -> HttpChecker {
    HttpChecker::new(timeout, USER_AGENT).expect("client should build")
}

#[tokio::test]
async fn test_check_returns_status_and_sends_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", USER_AGENT))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let status = checker(Duration::from_secs(5)).check(&server.uri()).await;

    assert_eq!(status, Ok(200));
}

#[tokio::test]
async fn test_error_status_is_returned_not_raised() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let status = checker(Duration::from_secs(5)).check(&server.uri()).await;

    assert_eq!(status, Ok(500));
}

#[tokio::test]
async fn test_redirects_are_followed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", format!("{}/new", server.uri())),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let status = checker(Duration::from_secs(5)).check(&format!("{}/old", server.uri())).await;

    assert_eq!(status, Ok(204));
}

#[tokio::test]
async fn test_slow_response_is_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let timeout = Duration::from_millis(300);
    let status = checker(timeout).check(&server.uri()).await;

    assert_eq!(status, Err(ProbeError::Timeout(timeout)));
}

#[tokio::test]
async fn test_prober_retries_bad_status_against_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let prober = Prober::new(Arc::new(checker(Duration::from_secs(5))), 3, Duration::ZERO);
    let result = prober.probe(&Target::new(format!("{}/flaky", server.uri()))).await;

    assert!(!result.success());
    assert_eq!(result.detail, "status 503");
    assert_eq!(result.attempts, 3);
}

#[tokio::test]
async fn test_prober_accepts_override_status_from_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let prober = Prober::new(Arc::new(checker(Duration::from_secs(5))), 2, Duration::ZERO);
    let result = prober.probe(&Target::new(server.uri()).accepting(403)).await;

    assert!(result.success());
    assert_eq!(result.detail, "status 403 (accepted)");
}
