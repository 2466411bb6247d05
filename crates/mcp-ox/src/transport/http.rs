use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex, PoisonError};

use axum::Router;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use futures_util::stream::Stream;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

use super::TransportError;
use crate::credentials::RequestContext;
use crate::server::McpServer;

const SESSION_BUFFER: usize = 32;

/// `POST /mcp` and `GET /health`.
pub fn streamable_router(server: McpServer) -> Router {
    Router::new()
        .route("/mcp", post(handle_mcp))
        .route("/health", get(health))
        .with_state(server)
}

/// Legacy MCP SSE transport: `GET /sse`, `POST /messages?session_id=...` and `GET /health`.
pub fn sse_router(server: McpServer) -> Router {
    let state = SseState {
        server,
        sessions: Arc::default(),
    };
    Router::new()
        .route("/sse", get(sse_connect))
        .route("/messages", post(sse_message))
        .route("/health", get(health))
        .with_state(state)
}

/// CORS for the configured origins. `None` when no origins are configured.
pub fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    if origins.is_empty() {
        return None;
    }

    let layer = if origins.iter().any(|origin| origin == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let allowed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| origin.trim_end_matches('/').parse().ok())
            .collect();
        CorsLayer::new().allow_origin(allowed)
    };
    Some(layer.allow_methods(Any).allow_headers(Any))
}

/// Binds `host:port` and serves `router` until ctrl-c.
pub async fn serve(router: Router, host: &str, port: u16) -> Result<(), TransportError> {
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn handle_mcp(State(server): State<McpServer>, headers: HeaderMap, body: String) -> Response {
    let request = RequestContext::new(headers);
    match server.handle_raw(&body, Some(&request)).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

type Sessions = Arc<Mutex<HashMap<Uuid, mpsc::Sender<Value>>>>;

#[derive(Clone)]
struct SseState {
    server: McpServer,
    sessions: Sessions,
}

/// Removes the session once its event stream is dropped.
struct SessionGuard {
    id: Uuid,
    sessions: Sessions,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
        tracing::debug!(session_id = %self.id, "sse session closed");
    }
}

async fn sse_connect(
    State(state): State<SseState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>> + Send + 'static> {
    let id = Uuid::new_v4();
    let (sender, receiver) = mpsc::channel(SESSION_BUFFER);
    state
        .sessions
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(id, sender);
    tracing::debug!(session_id = %id, "sse session opened");

    let guard = SessionGuard {
        id,
        sessions: state.sessions.clone(),
    };
    let endpoint = Event::default()
        .event("endpoint")
        .data(format!("/messages?session_id={id}"));
    let messages = ReceiverStream::new(receiver).map(move |message| {
        let _session = &guard;
        Ok(Event::default().event("message").data(message.to_string()))
    });

    Sse::new(tokio_stream::once(Ok(endpoint)).chain(messages)).keep_alive(KeepAlive::default())
}

#[derive(Debug, Deserialize)]
struct SessionQuery {
    session_id: Uuid,
}

async fn sse_message(
    State(state): State<SseState>,
    Query(query): Query<SessionQuery>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let sender = state
        .sessions
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&query.session_id)
        .cloned();
    let Some(sender) = sender else {
        return (StatusCode::NOT_FOUND, "unknown session").into_response();
    };

    let request = RequestContext::new(headers);
    let Some(response) = state.server.handle_raw(&body, Some(&request)).await else {
        return StatusCode::ACCEPTED.into_response();
    };
    match sender.send(response).await {
        Ok(()) => StatusCode::ACCEPTED.into_response(),
        Err(_) => (StatusCode::GONE, "session closed").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_from_origins() {
        assert!(cors_layer(&[]).is_none());
        assert!(cors_layer(&["*".to_string()]).is_some());
        assert!(cors_layer(&["http://localhost:3000/".to_string()]).is_some());
    }
}
