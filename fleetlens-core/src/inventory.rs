//! 云端资产清点：三类资源列表各自归并为一个数量

use crate::error::{Result, StatsError};
use futures::try_join;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use url::Url;

const ACCESS_KEY_HEADER: &str = "x-access-key";
const SECRET_KEY_HEADER: &str = "x-secret-key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// 云厂商接入配置：凭证与区域在构造时显式注入，不走全局状态。
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// 清单 API 根地址（以 `/` 结尾）
    pub endpoint: Url,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
}

/// 三类资源的数量。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InventoryCounts {
    pub compute: usize,
    pub storage: usize,
    pub database: usize,
}

/// 清单 API 客户端。
#[derive(Debug, Clone)]
pub struct InventoryClient {
    http: reqwest::Client,
    endpoint: Url,
    region: String,
}

// ==================== 清单 API 响应（只取计数所需的结构）====================

#[derive(Debug, Deserialize)]
struct ComputeInstancesPage {
    reservations: Vec<Reservation>,
}

#[derive(Debug, Deserialize)]
struct Reservation {
    instances: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct StorageBucketsPage {
    buckets: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DatabaseInstancesPage {
    db_instances: Vec<Value>,
}

impl InventoryClient {
    /// 根据配置构造客户端；凭证放进默认请求头。
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCESS_KEY_HEADER, header_value(&config.access_key)?);
        headers.insert(SECRET_KEY_HEADER, header_value(&config.secret_key)?);
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint,
            region: config.region,
        })
    }

    /// 响应标注用的区域：永远是实际查询的那一个。
    pub fn region(&self) -> &str {
        &self.region
    }

    /// 计算实例数：跨预约组求和。
    pub async fn count_compute_instances(&self) -> Result<usize> {
        let page: ComputeInstancesPage = self.fetch("compute/instances").await?;
        Ok(page.reservations.iter().map(|r| r.instances.len()).sum())
    }

    /// 存储桶数。
    pub async fn count_storage_buckets(&self) -> Result<usize> {
        let page: StorageBucketsPage = self.fetch("storage/buckets").await?;
        Ok(page.buckets.len())
    }

    /// 数据库实例数。
    pub async fn count_database_instances(&self) -> Result<usize> {
        let page: DatabaseInstancesPage = self.fetch("database/instances").await?;
        Ok(page.db_instances.len())
    }

    /// 三个清单之间没有顺序依赖，并发取回；任何一个失败则整体失败，
    /// 不返回部分结果。
    pub async fn counts(&self) -> Result<InventoryCounts> {
        let (compute, storage, database) = try_join!(
            self.count_compute_instances(),
            self.count_storage_buckets(),
            self.count_database_instances(),
        )?;
        Ok(InventoryCounts {
            compute,
            storage,
            database,
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self
            .endpoint
            .join(&format!("v1/regions/{}/{}", self.region, path))
            .map_err(|e| StatsError::Provider(format!("invalid inventory url: {e}")))?;
        tracing::debug!(%url, "fetching inventory listing");
        let resp = self.http.get(url).send().await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body: Value = resp
                .json()
                .await
                .unwrap_or_else(|_| json!({ "message": "unknown error" }));
            return Err(StatsError::Provider(format!(
                "inventory request failed {status}: {body}"
            )));
        }
        Ok(resp.json().await?)
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| StatsError::Provider("credential contains invalid header characters".into()))
}
