//! Integration tests for authentication and fetching
//!
//! These tests use wiremock to stand in for Reddit's token endpoint and
//! OAuth API, driving the real HTTP path end-to-end.

use reddit_fetcher::auth::Authenticator;
use reddit_fetcher::client::{FetchClient, RedditApi, RetryPolicy, TimeFilter};
use reddit_fetcher::config::{ApiConfig, Credentials};
use reddit_fetcher::service::RedditService;
use reddit_fetcher::{ApiError, AuthError, FetcherError, Session};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Base64 of "id:secret"
const BASIC_AUTH: &str = "Basic aWQ6c2VjcmV0";

fn credentials() -> Credentials {
    Credentials {
        client_id: "id".to_string(),
        client_secret: "secret".to_string(),
        user_agent: "test:reddit-fetcher:v1.0".to_string(),
    }
}

fn api_config(server: &MockServer) -> ApiConfig {
    ApiConfig {
        auth_url: server.uri(),
        api_url: server.uri(),
        timeout_secs: 5,
    }
}

fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        base_delay: Duration::from_millis(5),
        ..RetryPolicy::default()
    }
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .and(header("authorization", BASIC_AUTH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok",
            "token_type": "bearer",
            "expires_in": 86400,
            "scope": "*"
        })))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_verify(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path("/api/v1/scopes"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({})))
        .expect(1)
        .mount(server)
        .await;
}

async fn authenticated(server: &MockServer) -> Session {
    mount_token(server).await;
    mount_verify(server, 200).await;
    Authenticator::new(api_config(server))
        .authenticate(&credentials())
        .await
        .expect("authentication failed")
}

fn listing(posts: &[Value]) -> Value {
    json!({
        "kind": "Listing",
        "data": {
            "after": null,
            "children": posts
                .iter()
                .map(|p| json!({"kind": "t3", "data": p}))
                .collect::<Vec<_>>()
        }
    })
}

fn link_post(id: &str) -> Value {
    json!({
        "id": id,
        "title": format!("Post {}", id),
        "author": "alice",
        "ups": 10,
        "score": 8,
        "url": format!("https://example.com/{}", id),
        "created_utc": 1_700_000_000.0,
        "num_comments": 4,
        "is_self": false,
        "selftext": "ignored for link posts"
    })
}

#[tokio::test]
async fn test_authenticate_verifies_once() {
    let server = MockServer::start().await;
    let session = authenticated(&server).await;

    assert_eq!(session.token().scope(), Some("*"));
    assert!(!session.token().is_expired());
}

#[tokio::test]
async fn test_authenticate_with_huge_token_lifetime() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"access_token": "tok", "token_type": "bearer", "expires_in": 18446744073709551615}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;
    mount_verify(&server, 200).await;

    let session = Authenticator::new(api_config(&server))
        .authenticate(&credentials())
        .await
        .expect("authentication failed");

    assert!(!session.token().is_expired());
}

#[tokio::test]
async fn test_authenticate_rejected_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"message": "Unauthorized", "error": 401}"#))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/scopes"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = Authenticator::new(api_config(&server))
        .authenticate(&credentials())
        .await;

    assert!(matches!(result, Err(AuthError::Rejected { status: 401, .. })));
}

#[tokio::test]
async fn test_authenticate_error_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "invalid_grant"})))
        .mount(&server)
        .await;

    let result = Authenticator::new(api_config(&server))
        .authenticate(&credentials())
        .await;

    match result {
        Err(AuthError::Rejected { message, .. }) => assert_eq!(message, "invalid_grant"),
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn test_authenticate_verification_failure() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_verify(&server, 403).await;

    let result = Authenticator::new(api_config(&server))
        .authenticate(&credentials())
        .await;

    assert!(matches!(result, Err(AuthError::Verification { status: 403 })));
}

#[tokio::test]
async fn test_fetch_latest_over_http() {
    let server = MockServer::start().await;
    let session = authenticated(&server).await;

    Mock::given(method("GET"))
        .and(path("/r/testsub/new"))
        .and(query_param("limit", "2"))
        .and(query_param("raw_json", "1"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(listing(&[link_post("a"), link_post("b")]))
                .insert_header("x-ratelimit-remaining", "99.0"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = FetchClient::new(RedditApi::new(session)).with_policy(fast_policy());
    let posts = client.fetch_latest("testsub", 2).await.unwrap();

    let ids: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[tokio::test]
async fn test_fetch_latest_retries_after_429() {
    let server = MockServer::start().await;
    let session = authenticated(&server).await;

    Mock::given(method("GET"))
        .and(path("/r/python/new"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Too Many Requests"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/r/python/new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(&[link_post("z")])))
        .expect(1)
        .mount(&server)
        .await;

    let client = FetchClient::new(RedditApi::new(session)).with_policy(fast_policy());
    let posts = client.fetch_latest("python", 5).await.unwrap();

    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, "z");
}

#[tokio::test]
async fn test_fetch_latest_gives_up_after_three_429s() {
    let server = MockServer::start().await;
    let session = authenticated(&server).await;

    Mock::given(method("GET"))
        .and(path("/r/python/new"))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&server)
        .await;

    let client = FetchClient::new(RedditApi::new(session)).with_policy(fast_policy());
    let err = client.fetch_latest("python", 5).await.unwrap_err();

    assert!(err.is_rate_limit());
}

#[tokio::test]
async fn test_structured_ratelimit_body_is_retried() {
    let server = MockServer::start().await;
    let session = authenticated(&server).await;

    Mock::given(method("GET"))
        .and(path("/r/python/new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "json": {"errors": [["RATELIMIT", "you are doing that too much", "ratelimit"]]}
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/r/python/new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(&[link_post("ok")])))
        .mount(&server)
        .await;

    let client = FetchClient::new(RedditApi::new(session)).with_policy(fast_policy());
    let posts = client.fetch_latest("python", 5).await.unwrap();
    assert_eq!(posts[0].id, "ok");
}

#[tokio::test]
async fn test_missing_subreddit_is_not_retried() {
    let server = MockServer::start().await;
    let session = authenticated(&server).await;

    Mock::given(method("GET"))
        .and(path("/r/doesnotexist/new"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", "/subreddits/search.json?q=doesnotexist"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = FetchClient::new(RedditApi::new(session)).with_policy(fast_policy());
    let err = client.fetch_latest("doesnotexist", 5).await.unwrap_err();

    match err {
        ApiError::Fetch { subreddit, message } => {
            assert_eq!(subreddit, "doesnotexist");
            assert!(message.contains("does not exist"));
        }
        other => panic!("expected fetch error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_subreddit_with_rate_limit_in_name_exits_as_fetch_error() {
    let server = MockServer::start().await;
    let session = authenticated(&server).await;

    Mock::given(method("GET"))
        .and(path("/r/ratelimitfans/new"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", "/subreddits/search.json?q=ratelimitfans"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = FetchClient::new(RedditApi::new(session)).with_policy(fast_policy());
    let err = client.fetch_latest("ratelimitfans", 5).await.unwrap_err();

    assert!(!err.is_rate_limit());
    assert!(matches!(err, ApiError::Fetch { ref subreddit, .. } if subreddit == "ratelimitfans"));
    assert_eq!(FetcherError::from(err).exit_code(), 3);
}

#[tokio::test]
async fn test_malformed_listing() {
    let server = MockServer::start().await;
    let session = authenticated(&server).await;

    Mock::given(method("GET"))
        .and(path("/r/python/new"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let client = FetchClient::new(RedditApi::new(session)).with_policy(fast_policy());
    let err = client.fetch_latest("python", 5).await.unwrap_err();

    assert!(matches!(err, ApiError::Fetch { ref message, .. } if message.contains("malformed")));
}

#[tokio::test]
async fn test_service_maps_top_posts() {
    let server = MockServer::start().await;
    let session = authenticated(&server).await;

    let mut deleted_self_post = link_post("s");
    deleted_self_post["author"] = Value::Null;
    deleted_self_post["is_self"] = json!(true);
    deleted_self_post["selftext"] = json!("self body");

    Mock::given(method("GET"))
        .and(path("/r/rust/top"))
        .and(query_param("t", "week"))
        .and(query_param("limit", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(listing(&[link_post("l"), deleted_self_post])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = FetchClient::new(RedditApi::new(session)).with_policy(fast_policy());
    let service = RedditService::new(client);
    let posts = service
        .get_top_posts("r/rust", 2, TimeFilter::Week)
        .await
        .unwrap();

    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].author, "alice");
    assert_eq!(posts[0].selftext, None);
    assert_eq!(posts[1].author, "[deleted]");
    assert_eq!(posts[1].selftext.as_deref(), Some("self body"));
}
