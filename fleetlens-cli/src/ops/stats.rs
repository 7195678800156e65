//! stats / health 命令

use super::output::{print_json, OutputFormat};
use crate::client::handle_error;
use fleetlens_core::StatsReport;

/// 拉取 /api/stats 并按所选格式输出。
pub async fn show_stats(
    client: &reqwest::Client,
    api_base: &str,
    output: OutputFormat,
) -> anyhow::Result<()> {
    let resp = client.get(format!("{api_base}/api/stats")).send().await?;
    let report: StatsReport = handle_error(resp).await?.json().await?;
    match output {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => print_table(&report),
    }
    Ok(())
}

fn print_table(report: &StatsReport) {
    println!("{:<12} {}", "served by", report.served_by_ip);
    println!("{:<12} {}", "hostname", report.hostname);
    println!("{:<12} {}%", "cpu", report.local_cpu);
    println!("{:<12} {}%", "ram", report.local_ram);
    println!("{:<12} {}", "region", report.region);
    println!("{:<12} {}", "compute", report.compute_count);
    println!("{:<12} {}", "storage", report.storage_count);
    println!("{:<12} {}", "database", report.database_count);
}

pub async fn check_health(client: &reqwest::Client, api_base: &str) -> anyhow::Result<()> {
    let resp = client.get(format!("{api_base}/health")).send().await?;
    let body: serde_json::Value = handle_error(resp).await?.json().await?;
    println!("{body}");
    Ok(())
}
