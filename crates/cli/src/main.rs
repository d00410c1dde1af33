//! # Bench Runner CLI
//!
//! 命令行接口入口点。
//!
//! 提供：
//! - 运行配置加载、覆盖与验证
//! - 三阶段流水线执行
//! - 优雅关闭处理

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use observability::ObservabilityConfig;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_info, run_pipeline, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging (and metrics for `run`) based on CLI options
    observability::init_with_config(observability_config(&cli))?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Bench Runner CLI starting"
    );

    // Execute command
    let result = match &cli.command {
        Commands::Run(args) => run_pipeline(args).await,
        Commands::Validate(args) => run_validate(args),
        Commands::Info(args) => run_info(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

fn observability_config(cli: &Cli) -> ObservabilityConfig {
    let (default_log_level, force_level) = if cli.quiet {
        ("warn", true)
    } else {
        let level = match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        (level, false)
    };

    let metrics_port = match &cli.command {
        Commands::Run(args) if !args.dry_run => args.metrics_port(),
        _ => None,
    };

    ObservabilityConfig {
        log_format: cli.log_format.into(),
        metrics_port,
        default_log_level: default_log_level.to_string(),
        force_level,
    }
}
