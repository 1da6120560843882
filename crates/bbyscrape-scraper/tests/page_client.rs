//! Integration tests for `PageClient::fetch_page`.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no real
//! network traffic is made.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bbyscrape_scraper::{PageClient, ScraperError};

/// Client suitable for most tests: 5-second timeout, descriptive UA, no retries.
fn test_client() -> PageClient {
    PageClient::new(5, "bbyscrape-test/0.1", 0, 0).expect("failed to build test PageClient")
}

fn test_client_with_retries(max_retries: u32) -> PageClient {
    PageClient::new(5, "bbyscrape-test/0.1", max_retries, 0)
        .expect("failed to build test PageClient")
}

#[tokio::test]
async fn fetch_page_returns_status_body_and_final_url() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/site/phone.p"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>pdp</html>"))
        .mount(&server)
        .await;

    let client = test_client();
    let url = format!("{}/site/phone.p?skuId=123", server.uri());
    let page = client.fetch_page(&url).await.expect("expected Ok");

    assert_eq!(page.status, 200);
    assert_eq!(page.body, "<html>pdp</html>");
    assert!(
        page.final_url.contains("/site/phone.p"),
        "unexpected final URL: {}",
        page.final_url
    );
}

#[tokio::test]
async fn fetch_page_follows_redirects_and_reports_final_url() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("Location", format!("{}/new", server.uri())),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_string("moved here"))
        .mount(&server)
        .await;

    let client = test_client();
    let page = client
        .fetch_page(&format!("{}/old", server.uri()))
        .await
        .expect("expected Ok");

    assert_eq!(page.body, "moved here");
    assert!(
        page.final_url.ends_with("/new"),
        "expected redirect target, got: {}",
        page.final_url
    );
}

#[tokio::test]
async fn fetch_page_maps_404_to_not_found_without_retrying() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client_with_retries(3);
    let result = client.fetch_page(&format!("{}/gone", server.uri())).await;

    assert!(matches!(result, Err(ScraperError::NotFound { .. })));
}

#[tokio::test]
async fn fetch_page_maps_429_to_rate_limited_with_retry_after() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/busy"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
        .mount(&server)
        .await;

    let client = test_client();
    let result = client.fetch_page(&format!("{}/busy", server.uri())).await;

    match result {
        Err(ScraperError::RateLimited {
            retry_after_secs, ..
        }) => assert_eq!(retry_after_secs, 7),
        other => panic!("expected RateLimited, got: {other:?}"),
    }
}

#[tokio::test]
async fn fetch_page_retries_429_then_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("recovered"))
        .mount(&server)
        .await;

    let client = test_client_with_retries(2);
    let page = client
        .fetch_page(&format!("{}/flaky", server.uri()))
        .await
        .expect("expected Ok after retry");

    assert_eq!(page.body, "recovered");
}

#[tokio::test]
async fn fetch_page_retries_server_errors_then_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wobbly"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/wobbly"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let client = test_client_with_retries(2);
    let page = client
        .fetch_page(&format!("{}/wobbly", server.uri()))
        .await
        .expect("expected Ok after retries");

    assert_eq!(page.body, "ok");
}

#[tokio::test]
async fn fetch_page_does_not_retry_other_client_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bad"))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client_with_retries(3);
    let result = client.fetch_page(&format!("{}/bad", server.uri())).await;

    assert!(matches!(
        result,
        Err(ScraperError::UnexpectedStatus { status: 400, .. })
    ));
}
