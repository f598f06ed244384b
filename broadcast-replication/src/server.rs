//! HTTP coordinator binding the store, registry, and propagator together.
//!
//! The two write paths differ in one respect:
//!
//! - `PUT /items/{key}` applies locally and then broadcasts to every peer.
//! - `POST /message` applies locally and stops there.
//!
//! If the peer path re-broadcast, a write in a fully connected cluster would
//! bounce between nodes forever.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::propagator::HttpPropagator;
use crate::protocol::{ItemBody, Message, NodeRequest};
use crate::registry::{Node, NodeRegistry, Registry};
use crate::stats::StatsSnapshot;
use crate::store::{ItemStore, MemoryStore};

/// Shared handles every request handler works against.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn ItemStore>,
    registry: Arc<dyn NodeRegistry>,
}

impl AppState {
    /// `/stats` reports whatever `registry` counts.
    pub fn new(store: Arc<dyn ItemStore>, registry: Arc<dyn NodeRegistry>) -> Self {
        Self { store, registry }
    }

    /// Production wiring: in-memory store, HTTP fan-out to `peers`.
    pub fn with_http_peers(peers: &[String], peer_timeout: Duration) -> reqwest::Result<Self> {
        let propagator = Arc::new(HttpPropagator::new(peer_timeout)?);
        let registry = Registry::with_peers(propagator, peers.iter().cloned());
        Ok(Self::new(Arc::new(MemoryStore::new()), Arc::new(registry)))
    }
}

/// Builds the router for one node.
///
/// An item key is the whole path after `/items/`, slashes included, so
/// `/items/a/b` addresses the key `a/b` and `/items/` the empty key.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/items/", get(get_empty_key).put(put_empty_key))
        .route("/items/*key", get(get_item).put(put_item))
        .route("/message", post(receive_message))
        .route("/nodes", get(list_nodes).post(create_node))
        .route("/stats", get(get_stats))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn get_item(State(state): State<AppState>, Path(key): Path<String>) -> Response {
    read_item(&state, key)
}

async fn get_empty_key(State(state): State<AppState>) -> Response {
    read_item(&state, String::new())
}

fn read_item(state: &AppState, key: String) -> Response {
    match state.store.get(&key) {
        Some(value) => {
            debug!(%key, %value, "GET");
            (StatusCode::OK, value).into_response()
        }
        None => {
            debug!(%key, "GET - key not found");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

async fn put_item(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, String), ApiError> {
    write_item(&state, key, &body).await
}

async fn put_empty_key(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, String), ApiError> {
    write_item(&state, String::new(), &body).await
}

async fn write_item(
    state: &AppState,
    key: String,
    body: &[u8],
) -> Result<(StatusCode, String), ApiError> {
    let item: ItemBody = serde_json::from_slice(body)?;

    let stored = state.store.set(key.clone(), item.value);
    info!(%key, value = %stored, "PUT");

    // The write is already applied; replication outcome does not change the answer.
    state.registry.broadcast(&key, &stored).await;

    Ok((StatusCode::ACCEPTED, stored))
}

async fn receive_message(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let message: Message = serde_json::from_slice(&body)?;

    info!(key = %message.key, value = %message.value, "received replicated write");
    state.store.set(message.key, message.value);

    Ok(StatusCode::OK)
}

async fn list_nodes(State(state): State<AppState>) -> Json<Vec<Node>> {
    Json(state.registry.nodes())
}

async fn create_node(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        debug!("node registration without a body, nothing registered");
        return Ok(StatusCode::CREATED.into_response());
    }

    let request: NodeRequest = serde_json::from_slice(&body)?;
    let address = request.address.trim();
    if address.is_empty() {
        return Err(ApiError::EmptyAddress);
    }

    let node = state.registry.add_node(Node::new(address));
    info!(address = %node.address(), "registered node");

    Ok((StatusCode::CREATED, Json(node)).into_response())
}

async fn get_stats(State(state): State<AppState>) -> Json<StatsSnapshot> {
    Json(state.registry.stats())
}

/// A node's HTTP server bound to a listener.
pub struct Server {
    listener: TcpListener,
    state: AppState,
}

impl Server {
    pub fn new(listener: TcpListener, state: AppState) -> Self {
        Self { listener, state }
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves requests until `shutdown` resolves, then drains in-flight requests.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let Server { listener, state } = self;

        axum::serve(listener, router(state))
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("server stopped");
        Ok(())
    }

    pub async fn run_until_ctrl_c(self) -> Result<()> {
        self.run_until(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!(error = ?err, "failed to install ctrl-c handler");
            }
        })
        .await
    }
}
