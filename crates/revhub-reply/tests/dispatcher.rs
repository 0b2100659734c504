//! Integration tests for `ReplyDispatcher` using wiremock HTTP mocks.

use revhub_core::{Platform, ReplyCredentials};
use revhub_reply::{ReplyDispatcher, ReplyRequest};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn dispatcher(server: &MockServer, credentials: ReplyCredentials) -> ReplyDispatcher {
    ReplyDispatcher::with_base_urls(
        credentials,
        5,
        "revhub-test/0.1",
        &format!("{}/v4", server.uri()),
        &format!("{}/v19.0", server.uri()),
    )
    .expect("dispatcher construction should not fail")
}

fn google_credentials() -> ReplyCredentials {
    ReplyCredentials {
        google_access_token: Some("tok".to_owned()),
        google_account_id: Some("acc-1".to_owned()),
        google_location_id: Some("loc-1".to_owned()),
        facebook_access_token: None,
    }
}

fn request(platform: Platform, business_id: Option<&str>) -> ReplyRequest {
    ReplyRequest {
        review_id: "rev-123".to_owned(),
        platform,
        message: "Merci pour votre avis !".to_owned(),
        business_id: business_id.map(str::to_owned),
    }
}

#[tokio::test]
async fn google_without_credentials_falls_back_without_calling_out() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = dispatcher(&server, ReplyCredentials::default())
        .submit_reply(&request(Platform::Google, Some("0x47e66e:0x8d3ca9")))
        .await;

    assert!(!outcome.success);
    let url = outcome.fallback_url.expect("fallback url");
    assert!(url.contains("0x47e66e:0x8d3ca9"), "got {url}");
    assert!(outcome.error.is_some());
}

#[tokio::test]
async fn google_with_partial_credentials_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut creds = google_credentials();
    creds.google_account_id = None;

    let outcome = dispatcher(&server, creds)
        .submit_reply(&request(Platform::Google, None))
        .await;

    assert!(outcome.is_fallback());
    assert_eq!(
        outcome.fallback_url.as_deref(),
        Some("https://business.google.com/reviews")
    );
}

#[tokio::test]
async fn google_configured_puts_reply_and_returns_receipt() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v4/accounts/acc-1/locations/loc-1/reviews/rev-123/reply"))
        .and(header("authorization", "Bearer tok"))
        .and(body_json(json!({ "comment": "Merci pour votre avis !" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "comment": "Merci pour votre avis !",
            "updateTime": "2025-01-02T10:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = dispatcher(&server, google_credentials())
        .submit_reply(&request(Platform::Google, None))
        .await;

    assert!(outcome.success);
    assert!(outcome.fallback_url.is_none());
    assert_eq!(
        outcome.receipt.expect("receipt")["updateTime"],
        "2025-01-02T10:00:00Z"
    );
}

#[tokio::test]
async fn google_location_taken_from_business_id_when_not_configured() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v4/accounts/acc-1/locations/biz-9/reviews/rev-123/reply"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let mut creds = google_credentials();
    creds.google_location_id = None;

    let outcome = dispatcher(&server, creds)
        .submit_reply(&request(Platform::Google, Some("biz-9")))
        .await;

    assert!(outcome.success);
}

#[tokio::test]
async fn google_provider_failure_becomes_fallback_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": 403, "message": "The caller does not have permission" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = dispatcher(&server, google_credentials())
        .submit_reply(&request(Platform::Google, Some("loc-1")))
        .await;

    assert!(outcome.is_fallback());
    let error = outcome.error.expect("error");
    assert!(error.contains("403"), "got {error}");
    assert!(error.contains("does not have permission"), "got {error}");
}

#[tokio::test]
async fn facebook_without_token_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = dispatcher(&server, ReplyCredentials::default())
        .submit_reply(&request(Platform::Facebook, Some("mapage")))
        .await;

    assert!(outcome.is_fallback());
    assert_eq!(
        outcome.fallback_url.as_deref(),
        Some("https://www.facebook.com/mapage/reviews")
    );
}

#[tokio::test]
async fn facebook_configured_posts_comment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v19.0/rev-123/comments"))
        .and(query_param("access_token", "fb-token"))
        .and(body_json(json!({ "message": "Merci pour votre avis !" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "c_1" })))
        .expect(1)
        .mount(&server)
        .await;

    let creds = ReplyCredentials {
        facebook_access_token: Some("fb-token".to_owned()),
        ..ReplyCredentials::default()
    };

    let outcome = dispatcher(&server, creds)
        .submit_reply(&request(Platform::Facebook, None))
        .await;

    assert!(outcome.success);
    assert_eq!(outcome.receipt, Some(json!({ "id": "c_1" })));
}

#[tokio::test]
async fn facebook_server_error_keeps_text_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(1)
        .mount(&server)
        .await;

    let creds = ReplyCredentials {
        facebook_access_token: Some("fb-token".to_owned()),
        ..ReplyCredentials::default()
    };

    let outcome = dispatcher(&server, creds)
        .submit_reply(&request(Platform::Facebook, Some("mapage")))
        .await;

    assert!(outcome.is_fallback());
    let error = outcome.error.expect("error");
    assert!(error.contains("500") && error.contains("upstream exploded"));
}

#[tokio::test]
async fn unsupported_platform_fails_without_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = dispatcher(&server, google_credentials())
        .submit_reply(&request(Platform::Other("yelp".to_owned()), Some("x")))
        .await;

    assert!(!outcome.success);
    assert!(outcome.fallback_url.is_none());
    assert!(outcome.error.expect("error").contains("yelp"));
}

#[tokio::test]
async fn resubmitting_calls_the_provider_again() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(2)
        .mount(&server)
        .await;

    let dispatcher = dispatcher(&server, google_credentials());
    let req = request(Platform::Google, None);
    assert!(dispatcher.submit_reply(&req).await.success);
    assert!(dispatcher.submit_reply(&req).await.success);
}

#[tokio::test]
async fn facebook_network_failure_does_not_expose_token() {
    let dispatcher = ReplyDispatcher::with_base_urls(
        ReplyCredentials {
            facebook_access_token: Some("SUPER_SECRET_TOKEN".to_owned()),
            ..ReplyCredentials::default()
        },
        5,
        "revhub-test/0.1",
        "http://127.0.0.1:9",
        "http://127.0.0.1:9",
    )
    .expect("dispatcher construction should not fail");

    let outcome = dispatcher
        .submit_reply(&request(Platform::Facebook, Some("mapage")))
        .await;

    assert!(outcome.is_fallback());
    let error = outcome.error.expect("error");
    assert!(!error.contains("SUPER_SECRET_TOKEN"), "token leaked: {error}");
    assert!(!error.contains("access_token"), "query leaked: {error}");
}

#[tokio::test]
async fn unreadable_error_body_keeps_provider_status() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let _ = socket
                .write_all(b"HTTP/1.1 403 Forbidden\r\nContent-Length: 100\r\n\r\nshort")
                .await;
        }
    });

    let base = format!("http://{addr}");
    let dispatcher = ReplyDispatcher::with_base_urls(
        google_credentials(),
        5,
        "revhub-test/0.1",
        &base,
        &base,
    )
    .expect("dispatcher construction should not fail");

    let outcome = dispatcher
        .submit_reply(&request(Platform::Google, None))
        .await;

    assert!(outcome.is_fallback());
    let error = outcome.error.expect("error");
    assert!(error.contains("HTTP 403"), "got {error}");
}
