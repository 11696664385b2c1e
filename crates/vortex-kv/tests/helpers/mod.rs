//! Fake KV server para tests de integracion HTTP.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use axum::{
    Router,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use indexmap::IndexMap;
use tokio::sync::RwLock;

/// Estado compartido del servidor fake.
#[derive(Default)]
pub struct FakeKv {
    pub entries: RwLock<IndexMap<String, Bytes>>,
    /// Token requerido en `X-Consul-Token`, si existe.
    pub required_token: Option<String>,
    /// Cuando es true, los PUT responden `false`.
    pub reject_writes: AtomicBool,
    /// Cuando es true, todas las requests responden 500.
    pub failing: AtomicBool,
    pub requests: AtomicUsize,
}

impl FakeKv {
    fn authorized(&self, headers: &HeaderMap) -> bool {
        match &self.required_token {
            None => true,
            Some(token) => headers
                .get("x-consul-token")
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v == token),
        }
    }

    fn guard(&self, headers: &HeaderMap) -> Option<StatusCode> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Some(StatusCode::INTERNAL_SERVER_ERROR);
        }
        if !self.authorized(headers) {
            return Some(StatusCode::FORBIDDEN);
        }
        None
    }
}

async fn list_keys(State(kv): State<Arc<FakeKv>>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(status) = kv.guard(&headers) {
        return status.into_response();
    }

    let entries = kv.entries.read().await;
    if entries.is_empty() {
        return StatusCode::NOT_FOUND.into_response();
    }
    let keys: Vec<&String> = entries.keys().collect();
    axum::Json(keys).into_response()
}

async fn get_value(
    State(kv): State<Arc<FakeKv>>,
    Path(key): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Some(status) = kv.guard(&headers) {
        return status.into_response();
    }

    match kv.entries.read().await.get(&key) {
        Some(body) => body.clone().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn put_value(
    State(kv): State<Arc<FakeKv>>,
    Path(key): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    if let Some(status) = kv.guard(&headers) {
        return status.into_response();
    }

    if kv.reject_writes.load(Ordering::SeqCst) {
        return "false".into_response();
    }

    kv.entries.write().await.insert(key, body);
    "true".into_response()
}

/// Levanta el servidor fake en un puerto libre y retorna la base URL del KV.
pub async fn spawn_fake_kv(kv: Arc<FakeKv>) -> String {
    let app = Router::new()
        .route("/v1/kv/", get(list_keys))
        .route("/v1/kv/{*key}", get(get_value).put(put_value))
        .with_state(kv);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/v1/kv", addr)
}
