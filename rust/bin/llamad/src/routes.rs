//! Route registration for the entity API.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::error::ServiceError;
use crate::store::EntityStore;

/// Build the complete router over a shared store.
///
/// - `GET  /entities/{collection}`
/// - `POST /entities/{collection}`
/// - `GET  /entities/{collection}/{id}`
/// - `PUT  /entities/{collection}/{id}`
pub fn build_router(store: Arc<EntityStore>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/entities/{collection}", get(list).post(create))
        .route("/entities/{collection}/{id}", get(fetch).put(replace))
        .with_state(store)
}

fn ok(data: Value) -> Json<Value> {
    Json(json!({ "success": true, "data": data }))
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list(
    State(store): State<Arc<EntityStore>>,
    Path(collection): Path<String>,
) -> Json<Value> {
    ok(Value::Array(store.list(&collection)))
}

async fn fetch(
    State(store): State<Arc<EntityStore>>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<Json<Value>, ServiceError> {
    store.get(&collection, &id).map(ok)
}

async fn create(
    State(store): State<Arc<EntityStore>>,
    Path(collection): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ServiceError> {
    store.create(&collection, body).map(ok)
}

async fn replace(
    State(store): State<Arc<EntityStore>>,
    Path((collection, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ServiceError> {
    store.replace(&collection, &id, body).map(ok)
}
