use axum::extract::ConnectInfo;
use axum::http::{StatusCode, Uri};
use axum::Json;
use serde_json::json;
use std::net::SocketAddr;

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// 处理 404，顺带记录可疑请求
pub async fn handler_404(
    uri: Uri,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> (StatusCode, Json<serde_json::Value>) {
    tracing::warn!("404 请求: path={}, IP={}", uri.path(), addr.ip());

    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "not found" })),
    )
}
