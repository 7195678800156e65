//! 本机资源采样：CPU 利用率（两次计数器读数的差值）与内存利用率

use crate::error::{Result, StatsError};
use serde::Serialize;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;
use sysinfo::{MemoryRefreshKind, RefreshKind, System};
use tokio::time::sleep;

/// 默认采样窗口：短到不明显拖慢请求，长到能抹平计数器噪声
pub const DEFAULT_SAMPLE_WINDOW: Duration = Duration::from_millis(200);

/// 所有逻辑核心累计时间计数器的总和
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CpuTotals {
    /// 空闲时间（含 iowait）
    idle: u64,
    /// 全部状态时间之和
    total: u64,
}

/// 单次采样结果，两位小数，范围 [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UtilizationSample {
    pub cpu_percent: f64,
    pub ram_percent: f64,
}

/// 主机资源采样器：每次调用都重新读取 OS 计数器，调用之间不保留任何样本。
#[derive(Debug)]
pub struct Sampler {
    window: Duration,
    system: Arc<StdMutex<System>>,
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Sampler {
    pub fn new() -> Self {
        Self::with_window(DEFAULT_SAMPLE_WINDOW)
    }

    /// 指定采样窗口（两次计数器读数之间的间隔）。
    pub fn with_window(window: Duration) -> Self {
        Self {
            window,
            system: Arc::new(StdMutex::new(System::new())),
        }
    }

    /// 采集一次 CPU 与内存利用率。
    ///
    /// CPU 百分比是窗口期内的平均占用，不是真正的瞬时值。窗口期内计数器
    /// 没有前进时按加倍窗口重试一次，仍然停滞则返回错误而不是 NaN。
    pub async fn sample(&self) -> Result<UtilizationSample> {
        let cpu_percent = self.cpu_busy_percent().await?;
        let ram_percent = self.ram_used_percent()?;
        Ok(UtilizationSample {
            cpu_percent,
            ram_percent,
        })
    }

    #[cfg(target_os = "linux")]
    async fn cpu_busy_percent(&self) -> Result<f64> {
        let first = read_cpu_totals()?;
        sleep(self.window).await;
        let second = read_cpu_totals()?;
        match busy_percent(first, second) {
            // 窗口期内计数器未前进：加倍窗口重试一次
            Err(StatsError::StalledCounters) => {
                tracing::warn!("cpu counters did not advance; retrying with a doubled window");
                sleep(self.window * 2).await;
                let third = read_cpu_totals()?;
                busy_percent(first, third)
            }
            result => result,
        }
    }

    /// 非 Linux 平台退回 sysinfo 的两次刷新差值。
    #[cfg(not(target_os = "linux"))]
    async fn cpu_busy_percent(&self) -> Result<f64> {
        self.refresh_cpu();
        sleep(self.window).await;
        self.refresh_cpu();
        let sys = self.system.lock().unwrap_or_else(|e| e.into_inner());
        let cpus = sys.cpus();
        if cpus.is_empty() {
            return Err(StatsError::NoCores);
        }
        let avg = cpus.iter().map(|cpu| cpu.cpu_usage() as f64).sum::<f64>() / cpus.len() as f64;
        Ok(round2(avg.clamp(0.0, 100.0)))
    }

    #[cfg(not(target_os = "linux"))]
    fn refresh_cpu(&self) {
        let mut sys = self.system.lock().unwrap_or_else(|e| e.into_inner());
        sys.refresh_specifics(
            RefreshKind::new().with_cpu(sysinfo::CpuRefreshKind::everything()),
        );
    }

    fn ram_used_percent(&self) -> Result<f64> {
        let mut sys = self.system.lock().unwrap_or_else(|e| e.into_inner());
        sys.refresh_specifics(RefreshKind::new().with_memory(MemoryRefreshKind::everything()));
        memory_percent(sys.total_memory(), sys.free_memory())
    }
}

/// 读取 /proc/stat 的每核累计计数器并求和。
#[cfg(target_os = "linux")]
fn read_cpu_totals() -> Result<CpuTotals> {
    parse_cpu_totals(&std::fs::read_to_string("/proc/stat")?)
}

/// 每行格式：cpuN user nice system idle iowait irq softirq steal ...
/// idle 取 idle + iowait，total 取整行之和；只累计 cpuN 行，跳过聚合行。
fn parse_cpu_totals(stat: &str) -> Result<CpuTotals> {
    let mut idle = 0u64;
    let mut total = 0u64;
    let mut cores = 0usize;
    for line in stat.lines() {
        let mut fields = line.split_whitespace();
        let Some(label) = fields.next() else { continue };
        if !label.starts_with("cpu") || label == "cpu" {
            continue;
        }
        let values: Vec<u64> = fields.filter_map(|v| v.parse().ok()).collect();
        if values.len() < 4 {
            continue;
        }
        idle += values[3] + values.get(4).copied().unwrap_or(0);
        total += values.iter().sum::<u64>();
        cores += 1;
    }
    if cores == 0 {
        return Err(StatsError::NoCores);
    }
    Ok(CpuTotals { idle, total })
}

/// 两次读数的差值换算为忙碌百分比。
fn busy_percent(first: CpuTotals, second: CpuTotals) -> Result<f64> {
    let delta_total = second.total.saturating_sub(first.total);
    let delta_idle = second.idle.saturating_sub(first.idle);
    if delta_total == 0 {
        return Err(StatsError::StalledCounters);
    }
    let busy = delta_total.saturating_sub(delta_idle) as f64 / delta_total as f64 * 100.0;
    Ok(round2(busy.clamp(0.0, 100.0)))
}

/// (total - free) / total；total 为零时报错而不是除零。
fn memory_percent(total: u64, free: u64) -> Result<f64> {
    if total == 0 {
        return Err(StatsError::NoMemory);
    }
    let used = total.saturating_sub(free);
    Ok(round2((used as f64 / total as f64 * 100.0).clamp(0.0, 100.0)))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
