//! 聚合统计 API

use axum::extract::State;
use axum::Json;
use fleetlens_core::{HostIdentity, StatsReport};
use tracing::instrument;

use crate::app::{ApiError, AppState};

/// 采样与清单之间没有先后依赖，并发取回后合并成一个响应。
/// 任何一边失败都让整个请求失败，不返回部分结果。
#[instrument(skip_all)]
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsReport>, ApiError> {
    let (sample, counts) = tokio::try_join!(state.sampler.sample(), state.inventory.counts())?;
    let identity = HostIdentity::detect();
    let report = StatsReport::assemble(identity, sample, counts, state.inventory.region());
    Ok(Json(report))
}
