use super::{app_router, AppState};
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use fleetlens_core::{InventoryClient, ProviderConfig, Sampler};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use url::Url;

/// 本地 mock 清单服务：固定 3 台计算实例、2 个存储桶、1 个数据库实例
fn mock_provider() -> Router {
    Router::new()
        .route(
            "/v1/regions/:region/compute/instances",
            get(|| async {
                Json(json!({
                    "reservations": [
                        { "instances": [{ "instanceId": "i-1" }, { "instanceId": "i-2" }] },
                        { "instances": [{ "instanceId": "i-3" }] },
                    ]
                }))
            }),
        )
        .route(
            "/v1/regions/:region/storage/buckets",
            get(|| async { Json(json!({ "buckets": [{ "name": "assets" }, { "name": "logs" }] })) }),
        )
        .route(
            "/v1/regions/:region/database/instances",
            get(|| async { Json(json!({ "dbInstances": [{ "dbInstanceId": "db-1" }] })) }),
        )
}

async fn spawn_provider(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn test_state(endpoint: &str) -> AppState {
    let inventory = InventoryClient::new(ProviderConfig {
        endpoint: Url::parse(endpoint).unwrap(),
        region: "ap-south-1".into(),
        access_key: "test-ak".into(),
        secret_key: "test-sk".into(),
    })
    .unwrap();
    AppState {
        sampler: Arc::new(Sampler::with_window(Duration::from_millis(50))),
        inventory: Arc::new(inventory),
    }
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_ok() {
    let provider = spawn_provider(mock_provider()).await;
    let app = app_router(test_state(&format!("http://{provider}/")), Vec::new());
    let (status, body) = get_json(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn dashboard_serves_embedded_page() {
    let provider = spawn_provider(mock_provider()).await;
    let app = app_router(test_state(&format!("http://{provider}/")), Vec::new());
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let page = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(page.contains("cpuChart"));
    assert!(page.contains("/api/stats"));
}

#[tokio::test]
async fn stats_aggregates_sample_and_inventory() {
    let provider = spawn_provider(mock_provider()).await;
    let app = app_router(test_state(&format!("http://{provider}/")), Vec::new());
    let (status, body) = get_json(app, "/api/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ec2Count"], 3);
    assert_eq!(body["s3Count"], 2);
    assert_eq!(body["rdsCount"], 1);
    // 区域标注的是实际查询的那个
    assert_eq!(body["region"], "ap-south-1");
    assert!(!body["servedByIp"].as_str().unwrap().is_empty());
    assert!(!body["hostname"].as_str().unwrap().is_empty());

    // 利用率是两位小数字符串，且在界内
    for field in ["localCpu", "localRam"] {
        let pct: f64 = body[field].as_str().unwrap().parse().unwrap();
        assert!((0.0..=100.0).contains(&pct), "{field} out of range: {pct}");
    }
}

#[tokio::test]
async fn stats_fails_whole_request_when_one_listing_fails() {
    // 存储桶列表 503，其余正常：响应必须是 500，不能有部分结果
    let failing = Router::new()
        .route(
            "/v1/regions/:region/compute/instances",
            get(|| async { Json(json!({ "reservations": [] })) }),
        )
        .route(
            "/v1/regions/:region/storage/buckets",
            get(|| async {
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({ "message": "listing temporarily unavailable" })),
                )
            }),
        )
        .route(
            "/v1/regions/:region/database/instances",
            get(|| async { Json(json!({ "dbInstances": [] })) }),
        );
    let provider = spawn_provider(failing).await;
    let app = app_router(test_state(&format!("http://{provider}/")), Vec::new());
    let (status, body) = get_json(app, "/api/stats").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("503"), "missing status in: {message}");
}

#[tokio::test]
async fn stats_fails_when_provider_unreachable() {
    // 占一个端口再释放，拿到一个几乎必然拒绝连接的地址
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let app = app_router(test_state(&format!("http://{addr}/")), Vec::new());
    let (status, body) = get_json(app, "/api/stats").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn unknown_route_returns_json_404() {
    let provider = spawn_provider(mock_provider()).await;
    let app = app_router(test_state(&format!("http://{provider}/")), Vec::new());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/missing")
                .extension(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4321))))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "not found");
}
