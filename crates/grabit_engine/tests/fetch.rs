use std::time::Duration;

use grabit_engine::{FetchError, FetchSettings, Fetcher, ReqwestFetcher};
use pretty_assertions::assert_eq;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// The fetcher is blocking; run it off the test runtime's reactor thread.
async fn blocking<T, F>(work: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(work).await.unwrap()
}

fn fetcher_with(settings: FetchSettings) -> ReqwestFetcher {
    ReqwestFetcher::new(settings).unwrap()
}

#[tokio::test]
async fn page_fetch_returns_bytes_and_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/article"))
        .and(header("accept-language", "en-US,en;q=0.9"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_bytes(b"<html>hello</html>".to_vec()),
        )
        .mount(&server)
        .await;

    let url = format!("{}/article", server.uri());
    let fetcher = fetcher_with(FetchSettings::default());
    let page = blocking(move || fetcher.fetch_page(&url)).await.unwrap();

    assert_eq!(page.bytes, b"<html>hello</html>".to_vec());
    assert_eq!(
        page.content_type.as_deref(),
        Some("text/html; charset=utf-8")
    );
}

#[tokio::test]
async fn configured_user_agent_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/article"))
        .and(header("user-agent", "Grabit/0.4.0"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/article", server.uri());
    let fetcher = fetcher_with(FetchSettings {
        user_agent: Some("Grabit/0.4.0".to_string()),
        ..FetchSettings::default()
    });
    blocking(move || fetcher.fetch_page(&url)).await.unwrap();
}

#[tokio::test]
async fn non_success_status_is_a_page_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = format!("{}/missing", server.uri());
    let fetcher = fetcher_with(FetchSettings::default());
    let err = blocking(move || fetcher.fetch_page(&url)).await.unwrap_err();

    assert_eq!(err, FetchError::HttpStatus(404));
}

#[tokio::test]
async fn invalid_url_is_rejected_before_any_request() {
    let fetcher = fetcher_with(FetchSettings::default());
    let err = blocking(move || fetcher.fetch_page("not a url"))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::InvalidUrl(_)));
}

#[tokio::test]
async fn image_fetch_returns_bytes_on_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/photo.jpg"))
        .and(header("accept", "image/*"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg".to_vec()))
        .mount(&server)
        .await;

    let url = format!("{}/photo.jpg", server.uri());
    let fetcher = fetcher_with(FetchSettings::default());
    let bytes = blocking(move || fetcher.fetch_image(&url)).await;

    assert_eq!(bytes, Some(b"jpeg".to_vec()));
}

#[tokio::test]
async fn image_fetch_degrades_to_none_on_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = format!("{}/gone.png", server.uri());
    let fetcher = fetcher_with(FetchSettings::default());
    let bytes = blocking(move || fetcher.fetch_image(&url)).await;

    assert_eq!(bytes, None);
}

#[tokio::test]
async fn slow_image_responses_time_out_to_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow.jpg"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"late".to_vec())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let url = format!("{}/slow.jpg", server.uri());
    let fetcher = fetcher_with(FetchSettings {
        image_timeout: Duration::from_millis(200),
        ..FetchSettings::default()
    });
    let bytes = blocking(move || fetcher.fetch_image(&url)).await;

    assert_eq!(bytes, None);
}
