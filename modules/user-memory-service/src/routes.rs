//! Axum route handlers for the user memory RPC API.

use crate::db::Db;
use crate::tools::ToolRegistry;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use std::sync::Arc;
use std::time::Instant;
use user_memory_types::*;

pub struct AppState {
    pub db: Arc<Db>,
    pub tools: ToolRegistry,
    pub start_time: Instant,
}

// GET /rpc/tools/list
pub async fn list_tools(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<RpcResponse<Vec<ToolDefinition>>>) {
    (StatusCode::OK, Json(RpcResponse::ok(state.tools.definitions())))
}

// POST /rpc/tools/call
pub async fn call_tool(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ToolCallRequest>,
) -> (StatusCode, Json<RpcResponse<ToolResult>>) {
    match state.tools.call(&req.name, req.arguments).await {
        Some(result) => (StatusCode::OK, Json(RpcResponse::ok(result))),
        None => (
            StatusCode::NOT_FOUND,
            Json(RpcResponse::err(format!("Unknown tool: {}", req.name))),
        ),
    }
}

// POST /rpc/facts/store
pub async fn store_fact(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StoreFactRequest>,
) -> (StatusCode, Json<RpcResponse<StoredFact>>) {
    let db = Arc::clone(&state.db);
    let result = tokio::task::spawn_blocking(move || db.append(&req.user_id, &req.fact)).await;
    match result {
        Ok(Ok(id)) => (StatusCode::OK, Json(RpcResponse::ok(StoredFact { id }))),
        Ok(Err(e)) => (StatusCode::INTERNAL_SERVER_ERROR, Json(RpcResponse::err(e.to_string()))),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, Json(RpcResponse::err(e.to_string()))),
    }
}

// POST /rpc/facts/list
pub async fn list_facts(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ListFactsRequest>,
) -> (StatusCode, Json<RpcResponse<Vec<Fact>>>) {
    let db = Arc::clone(&state.db);
    let result = tokio::task::spawn_blocking(move || db.list_by_user(&req.user_id)).await;
    match result {
        Ok(Ok(facts)) => (StatusCode::OK, Json(RpcResponse::ok(facts))),
        Ok(Err(e)) => (StatusCode::INTERNAL_SERVER_ERROR, Json(RpcResponse::err(e.to_string()))),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, Json(RpcResponse::err(e.to_string()))),
    }
}

async fn fetch_stats(db: &Arc<Db>) -> Result<FactStats, String> {
    let db = Arc::clone(db);
    match tokio::task::spawn_blocking(move || db.stats()).await {
        Ok(result) => result.map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    }
}

// GET /rpc/stats
pub async fn stats(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<RpcResponse<FactStats>>) {
    match fetch_stats(&state.db).await {
        Ok(s) => (StatusCode::OK, Json(RpcResponse::ok(s))),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, Json(RpcResponse::err(e))),
    }
}

// GET /rpc/status
pub async fn status(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<RpcResponse<ServiceStatus>>) {
    let stats = fetch_stats(&state.db).await.ok();
    (
        StatusCode::OK,
        Json(RpcResponse::ok(ServiceStatus {
            running: true,
            uptime_secs: state.start_time.elapsed().as_secs(),
            total_facts: stats.as_ref().map(|s| s.total_facts).unwrap_or(0),
            total_users: stats.as_ref().map(|s| s.total_users).unwrap_or(0),
        })),
    )
}

pub fn router(state: Arc<AppState>) -> axum::Router {
    axum::Router::new()
        .route("/rpc/tools/list", axum::routing::get(list_tools))
        .route("/rpc/tools/call", axum::routing::post(call_tool))
        .route("/rpc/facts/store", axum::routing::post(store_fact))
        .route("/rpc/facts/list", axum::routing::post(list_facts))
        .route("/rpc/stats", axum::routing::get(stats))
        .route("/rpc/status", axum::routing::get(status))
        .with_state(state)
        .layer(tower_http::cors::CorsLayer::permissive())
}
