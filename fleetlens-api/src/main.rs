mod app;

use app::{app_router, AppState};
use dotenvy::dotenv;
use fleetlens_core::{InventoryClient, ProviderConfig, Sampler, DEFAULT_SAMPLE_WINDOW};
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

#[derive(Debug, Clone)]
struct ApiConfig {
    bind: SocketAddr,
    /// 清单 API 根地址
    provider_endpoint: Url,
    /// 清单查询的区域；响应里标注的就是它
    provider_region: String,
    access_key: String,
    secret_key: String,
    /// CPU 采样窗口
    sample_window: Duration,
    /// CORS 允许的来源列表（空则允许所有）
    cors_origins: Vec<String>,
}

impl ApiConfig {
    fn from_env() -> Self {
        let bind = env::var("FLEET_BIND")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| "0.0.0.0:3000".parse().expect("valid default bind"));

        let provider_endpoint = env::var("FLEET_PROVIDER_ENDPOINT")
            .ok()
            .and_then(|s| Url::parse(&s).ok())
            .unwrap_or_else(|| {
                Url::parse("http://127.0.0.1:9000/").expect("valid default endpoint")
            });

        let provider_region =
            env::var("FLEET_PROVIDER_REGION").unwrap_or_else(|_| "ap-south-1".into());

        // 凭证缺省为空：本地 mock 不校验；真实接入必须配置
        let access_key = env::var("FLEET_PROVIDER_ACCESS_KEY").unwrap_or_default();
        let secret_key = env::var("FLEET_PROVIDER_SECRET_KEY").unwrap_or_default();

        let sample_window = env::var("FLEET_SAMPLE_WINDOW_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_SAMPLE_WINDOW);

        // CORS 允许的来源，逗号分隔；空或 "*" 表示允许所有
        let cors_origins = env::var("FLEET_CORS_ORIGINS")
            .ok()
            .map(|s| {
                let trimmed = s.trim();
                if trimmed.is_empty() || trimmed == "*" {
                    vec![]
                } else {
                    trimmed
                        .split(',')
                        .filter(|t| !t.trim().is_empty())
                        .map(|t| t.trim().to_string())
                        .collect()
                }
            })
            .unwrap_or_default();

        Self {
            bind,
            provider_endpoint,
            provider_region,
            access_key,
            secret_key,
            sample_window,
            cors_origins,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 优先读取 .env（若存在）
    let _ = dotenv();
    init_tracing();

    let config = ApiConfig::from_env();
    info!("starting API on {}", config.bind);
    if config.access_key.is_empty() || config.secret_key.is_empty() {
        tracing::warn!(
            "provider credentials not configured; inventory requests will go out unsigned"
        );
    }

    let sampler = Arc::new(Sampler::with_window(config.sample_window));
    let inventory = Arc::new(InventoryClient::new(ProviderConfig {
        endpoint: config.provider_endpoint.clone(),
        region: config.provider_region.clone(),
        access_key: config.access_key.clone(),
        secret_key: config.secret_key.clone(),
    })?);

    let state = AppState { sampler, inventory };

    let app = app_router(state, config.cors_origins.clone());
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn init_tracing() {
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
