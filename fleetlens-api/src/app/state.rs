use fleetlens_core::{InventoryClient, Sampler};
use std::sync::Arc;

/// Shared application state for handlers.
#[derive(Clone)]
pub struct AppState {
    /// 本机资源采样器
    pub sampler: Arc<Sampler>,
    /// 云端清单客户端
    pub inventory: Arc<InventoryClient>,
}
