mod client;
mod ops;

use clap::{Parser, Subcommand};
use ops::{check_health, show_stats, OutputFormat};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI wrapper around the Fleetlens HTTP API.
#[derive(Parser)]
#[command(
    name = "fleetlens-cli",
    author,
    version,
    about = "CLI for the Fleetlens dashboard API"
)]
struct Cli {
    /// API base url
    #[arg(long, env = "FLEET_API_BASE", default_value = "http://127.0.0.1:3000")]
    api_base: String,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 拉取一次聚合统计（本机利用率 + 云端清单计数）
    Stats,
    /// 检查 API 存活
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载 .env 文件（如果存在），忽略错误
    let _ = dotenvy::dotenv();
    init_tracing();
    let cli = Cli::parse();
    let client = client::build_client()?;

    match cli.command {
        Commands::Stats => show_stats(&client, &cli.api_base, cli.output).await?,
        Commands::Health => check_health(&client, &cli.api_base).await?,
    }

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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clap_parses() {
        let args = ["fleetlens", "stats"];
        let _ = Cli::parse_from(args);
    }

    #[test]
    fn clap_parses_output_flag() {
        let args = ["fleetlens", "--output", "json", "stats"];
        let _ = Cli::parse_from(args);
    }
}
