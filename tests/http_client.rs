//! HTTP procedure client against a mock server.

mod common;

use bluefeed::api::{ApiError, CreatePostInput, FeedApi, HttpFeedApi};
use bluefeed::config::ApiConfig;
use bluefeed::model::PostId;
use common::mock_server::{MockResponse, MockServer};

fn client_for(server: &MockServer, token: Option<&str>) -> HttpFeedApi {
    let config = ApiConfig {
        base_url: server.base_url(),
        session_token: token.map(str::to_string),
        timeout_seconds: 2,
        connect_timeout_seconds: 1,
        max_retries: 2,
        retry_backoff_base_ms: 1,
    };
    HttpFeedApi::new(&config).unwrap()
}

const FEED: &str = r#"[
    {"id": "p1", "userId": "u1", "content": "hi", "createdAt": "2024-11-02T10:00:00Z",
     "likes": [{"userId": "u2", "entityId": "p1", "createdAt": "2024-11-02T10:01:00Z"}]},
    {"id": "p2", "userId": "u2", "createdAt": "2024-11-01T10:00:00Z"}
]"#;

#[tokio::test]
async fn test_latest_feed_is_a_get_query() {
    let server = MockServer::start().await;
    server.enqueue_response(MockResponse::json(FEED)).await;
    let api = client_for(&server, Some("secret"));

    let posts = api.latest_feed().await.unwrap();

    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].likes.len(), 1);

    let requests = server.captured_requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/api/post.getLatestFeed");
    assert_eq!(requests[0].query, None);
    assert_eq!(requests[0].header("authorization"), Some("Bearer secret"));
}

#[tokio::test]
async fn test_query_input_is_json_encoded() {
    let server = MockServer::start().await;
    server
        .enqueue_response(MockResponse::json(
            r#"{"id": "p1", "userId": "u1", "createdAt": "2024-11-02T10:00:00Z"}"#,
        ))
        .await;
    let api = client_for(&server, None);

    let post = api.post_by_id(&PostId::from("p1")).await.unwrap();

    assert_eq!(post.id, PostId::from("p1"));
    let requests = server.captured_requests().await;
    assert_eq!(requests[0].query.as_deref(), Some("input=%22p1%22"));
    assert_eq!(requests[0].header("authorization"), None);
}

#[tokio::test]
async fn test_mutation_posts_json_body() {
    let server = MockServer::start().await;
    server
        .enqueue_response(MockResponse::json(
            r#"{"id": "p7", "userId": "u1", "content": "hello", "createdAt": "2024-11-02T10:00:00Z"}"#,
        ))
        .await;
    let api = client_for(&server, None);

    let post = api
        .create_post(&CreatePostInput::text("hello"))
        .await
        .unwrap();

    assert_eq!(post.id, PostId::from("p7"));
    let requests = server.captured_requests().await;
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/api/post.create");
    assert_eq!(
        requests[0].json_body(),
        serde_json::json!({"content": "hello", "postType": "text", "visibility": "public"})
    );
}

#[tokio::test]
async fn test_toggle_like_decodes_result() {
    let server = MockServer::start().await;
    server
        .enqueue_response(MockResponse::json(r#"{"liked": false}"#))
        .await;
    let api = client_for(&server, None);

    let toggled = api.toggle_like(&PostId::from("p1")).await.unwrap();

    assert!(!toggled.liked);
    let requests = server.captured_requests().await;
    assert_eq!(requests[0].json_body(), serde_json::json!("p1"));
}

#[tokio::test]
async fn test_error_statuses_are_classified() {
    let server = MockServer::start().await;
    server
        .enqueue_response(MockResponse::error(401, "UNAUTHORIZED", "sign in"))
        .await;
    server
        .enqueue_response(MockResponse::error(404, "NOT_FOUND", "no such post"))
        .await;
    server
        .enqueue_response(MockResponse::error(400, "BAD_REQUEST", "content too long"))
        .await;
    let api = client_for(&server, None);
    let id = PostId::from("p1");

    assert!(matches!(
        api.toggle_like(&id).await,
        Err(ApiError::Unauthorized { message }) if message == "sign in"
    ));
    assert!(matches!(
        api.toggle_favorite(&id).await,
        Err(ApiError::NotFound { .. })
    ));
    assert!(matches!(
        api.create_post(&CreatePostInput::text("x")).await,
        Err(ApiError::Rejected { status: 400, .. })
    ));
}

#[tokio::test]
async fn test_mutations_are_not_retried() {
    let server = MockServer::start().await;
    server
        .enqueue_response(MockResponse::error(503, "UNAVAILABLE", "try later"))
        .await;
    let api = client_for(&server, None);

    let result = api.delete_post(&PostId::from("p1")).await;

    assert!(matches!(result, Err(ApiError::Server { status: 503, .. })));
    assert_eq!(server.captured_requests().await.len(), 1);
}

#[tokio::test]
async fn test_undecodable_body_is_reported() {
    let server = MockServer::start().await;
    server
        .enqueue_response(MockResponse::json(r#"{"unexpected": true}"#))
        .await;
    let api = client_for(&server, None);

    let result = api.latest_feed().await;

    assert!(matches!(result, Err(ApiError::Decode { procedure, .. }) if procedure == "post.getLatestFeed"));
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;
    server
        .enqueue_response(MockResponse::json(r#"{"liked": true}"#).with_delay(3_000))
        .await;
    let api = client_for(&server, None);

    let result = api.toggle_like(&PostId::from("p1")).await;

    assert!(matches!(result, Err(ApiError::Timeout { .. })));
}

#[tokio::test]
async fn test_unreachable_server_query_fails_with_transport_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = ApiConfig {
        base_url: format!("http://127.0.0.1:{}/api", port),
        max_retries: 1,
        retry_backoff_base_ms: 1,
        ..ApiConfig::default()
    };
    let api = HttpFeedApi::new(&config).unwrap();

    let err = api.latest_feed().await.unwrap_err();

    assert!(err.is_retryable());
    assert!(matches!(err, ApiError::Transport { .. }));
}
