//! HTTP boundary
//!
//! Accepts a JSON query by POST and answers with plain text: the rendered
//! payload on success, a single diagnostic line otherwise. Every response
//! is `200 OK`.

use crate::dispatch::Dispatcher;
use crate::error::ExporterError;
use crate::query::Query;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::Instrument;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Shared state for request handlers
pub struct AppState {
    pub dispatcher: Dispatcher,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}

/// Build the router with all routes
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(handle_query))
        .route("/query", post(handle_query))
        .route("/healthz", get(healthz))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Serve on an already bound listener until `shutdown` resolves
pub async fn serve(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Listening on {}", addr);
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn healthz() -> impl IntoResponse {
    ([(CONTENT_TYPE, TEXT_PLAIN)], crate::query::PING_OK)
}

async fn handle_query(State(state): State<Arc<AppState>>, body: Bytes) -> impl IntoResponse {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("query", %request_id);
    let text = respond(&state.dispatcher, &body).instrument(span).await;
    ([(CONTENT_TYPE, TEXT_PLAIN)], text)
}

/// Decode, dispatch and format one request body
pub async fn respond(dispatcher: &Dispatcher, body: &[u8]) -> String {
    let query = match Query::from_json(body) {
        Ok(query) => query,
        Err(e) => {
            tracing::debug!("Malformed query: {}", e);
            return ExporterError::MalformedQuery(e).response_text();
        }
    };

    tracing::debug!(
        resource = %query.resource,
        project = %query.project,
        action = %query.action,
        namespace = %query.namespace,
        target = %query.target,
        arg1 = %query.arg1,
        zone = %query.zone,
        region = %query.region,
        "Decoded query"
    );

    match dispatcher.dispatch(&query).await {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!("Query failed: {}", e);
            e.response_text()
        }
    }
}
