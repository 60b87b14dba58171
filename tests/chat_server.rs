use std::sync::{
    Arc,
    Mutex,
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{
        header,
        Method,
        Request,
        StatusCode,
    },
    Router,
};
use farmguard::{
    chat::{
        create_router,
        ChatBackend,
        ChatClient,
    },
    core::{
        FarmError,
        Language,
    },
};
use serde_json::{
    json,
    Value,
};
use tower::ServiceExt;

#[derive(Default)]
struct RecordingBackend {
    fail: bool,
    calls: Mutex<Vec<(String, Language)>>,
}

#[async_trait]
impl ChatBackend for RecordingBackend {
    async fn complete(&self, message: &str, language: Language) -> Result<String, FarmError> {
        self.calls.lock().unwrap().push((message.to_string(), language));
        if self.fail {
            return Err(FarmError::Http { status: 503, body: "overloaded".to_string() });
        }
        Ok(format!("[{}] {}", language.code(), message))
    }
}

fn chat_request(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn call(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_chat_success_uses_requested_language() {
    let backend = Arc::new(RecordingBackend::default());
    let router = create_router(backend.clone());

    let (status, body) =
        call(router, chat_request(r#"{"message": "  Is my cow in withdrawal?  ", "language": "hindi"}"#))
            .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "reply": "[hi] Is my cow in withdrawal?", "success": true }));
    assert_eq!(
        backend.calls.lock().unwrap().as_slice(),
        &[("Is my cow in withdrawal?".to_string(), Language::Hindi)]
    );
}

#[tokio::test]
async fn test_chat_defaults_to_english() {
    let backend = Arc::new(RecordingBackend::default());
    let router = create_router(backend.clone());

    let (status, body) = call(router, chat_request(r#"{"message": "hello"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], "[en] hello");
}

#[tokio::test]
async fn test_empty_message_is_bad_request() {
    let backend = Arc::new(RecordingBackend::default());
    let router = create_router(backend.clone());

    let (status, body) =
        call(router, chat_request(r#"{"message": "   ", "language": "bengali"}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
    assert!(backend.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let router = create_router(Arc::new(RecordingBackend::default()));

    let (status, body) = call(router, chat_request("not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_upstream_failure_is_server_error() {
    let backend = Arc::new(RecordingBackend { fail: true, ..Default::default() });
    let router = create_router(backend);

    let (status, body) = call(router, chat_request(r#"{"message": "hello"}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(body.get("reply").is_none());
}

#[tokio::test]
async fn test_cors_preflight_allows_any_origin() {
    let router = create_router(Arc::new(RecordingBackend::default()));

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/chat")
        .header(header::ORIGIN, "https://dashboard.example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert!(response.status().is_success());
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn test_health() {
    let router = create_router(Arc::new(RecordingBackend::default()));
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let (status, body) = call(router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

async fn spawn_proxy(backend: Arc<RecordingBackend>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, create_router(backend)).await.unwrap();
    });
    format!("http://{addr}/chat")
}

#[tokio::test]
async fn test_client_round_trip() {
    let endpoint = spawn_proxy(Arc::new(RecordingBackend::default())).await;
    let client = ChatClient::new(&endpoint).unwrap();

    let reply = client.ask("namaste", Language::Bengali).await.unwrap();
    assert_eq!(reply, "[bn] namaste");
}

#[tokio::test]
async fn test_client_maps_error_envelope() {
    let endpoint =
        spawn_proxy(Arc::new(RecordingBackend { fail: true, ..Default::default() })).await;
    let client = ChatClient::new(&endpoint).unwrap();

    match client.ask("hello", Language::English).await {
        Err(FarmError::Chat(message)) => assert!(!message.is_empty()),
        other => panic!("expected chat error, got {other:?}"),
    }

    assert!(matches!(
        client.ask("", Language::English).await,
        Err(FarmError::Chat(_))
    ));
}
