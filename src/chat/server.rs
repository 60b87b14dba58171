use std::{
    net::{
        IpAddr,
        SocketAddr,
    },
    sync::Arc,
};

use axum::{
    extract::{
        rejection::JsonRejection,
        State,
    },
    http::StatusCode,
    routing::{
        get,
        post,
    },
    Json,
    Router,
};
use serde::Serialize;
use tower_http::{
    cors::{
        Any,
        CorsLayer,
    },
    trace::TraceLayer,
};

use super::{
    types::{
        ChatRequest,
        ChatResponse,
    },
    upstream::ChatBackend,
};
use crate::core::FarmError;

#[derive(Clone)]
pub struct ChatState {
    pub backend: Arc<dyn ChatBackend>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Chat proxy router.
///
/// * `POST /chat` answers `{message, language}` with `{reply, success: true}`,
///   or `{error, success: false}` with 400 for a bad request and 500 when the
///   upstream assistant fails.
/// * `GET /health` reports liveness.
///
/// CORS is open to every origin since the dashboard is served from a
/// different host than the proxy.
pub fn create_router(backend: Arc<dyn ChatBackend>) -> Router {
    let cors_layer = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/chat", post(chat_handler))
        .route("/health", get(health_handler))
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(ChatState { backend })
}

pub async fn chat_handler(
    State(state): State<ChatState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> (StatusCode, Json<ChatResponse>) {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!("Rejected chat request: {}", rejection.body_text());
            return (StatusCode::BAD_REQUEST, Json(ChatResponse::error("Invalid request body")));
        }
    };

    let message = request.message.trim();
    if message.is_empty() {
        return (StatusCode::BAD_REQUEST, Json(ChatResponse::error("Message is required")));
    }

    let language = request.language();
    match state.backend.complete(message, language).await {
        Ok(reply) => (StatusCode::OK, Json(ChatResponse::reply(reply))),
        Err(e) => {
            tracing::error!("Chat backend failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ChatResponse::error("Failed to get a response from the assistant")),
            )
        }
    }
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Binds `host:port` and serves the chat proxy until the process exits.
pub async fn serve(host: &str, port: u16, backend: Arc<dyn ChatBackend>) -> Result<(), FarmError> {
    let ip: IpAddr = host
        .parse()
        .map_err(|e| FarmError::Config(format!("Invalid host address {host}: {e}")))?;
    let addr = SocketAddr::new(ip, port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Chat proxy listening on http://{}", addr);

    axum::serve(listener, create_router(backend)).await?;
    Ok(())
}
