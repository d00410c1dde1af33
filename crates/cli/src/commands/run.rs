//! `run` command implementation.

use anyhow::{Context, Result};
use std::future::Future;
use contracts::RunLayout;
use runner::{PipelineRunner, StagePlan};
use stage_executor::ProcessExecutor;
use tracing::{info, warn};

use super::{load_profile, print_plan, print_profile};
use crate::cli::RunArgs;

/// Execute the `run` command
pub async fn run_pipeline(args: &RunArgs) -> Result<()> {
    info!(profile = %args.profile.display(), "Loading profile");

    let mut profile = load_profile(&args.profile)?;

    // Apply CLI overrides, then check the result again
    args.overrides.apply(&mut profile);
    config_loader::ConfigLoader::validate(&profile)
        .context("Profile is invalid after command-line overrides")?;

    for warning in config_loader::ConfigLoader::warnings(&profile) {
        warn!("{}", warning);
    }

    let layout = RunLayout::from_profile(&profile);
    info!(
        lib = %profile.lib,
        frame = %profile.frame(),
        model = %profile.model,
        version = %profile.version,
        result_dir = %layout.result_dir.display(),
        "Profile loaded"
    );

    print_profile(&profile, &layout);

    // Dry run - show what would be executed and exit
    if args.dry_run {
        let plan = StagePlan::build(&profile, &layout)?;
        print_plan(&plan);
        info!("Dry run mode - no directories created, no stage started");
        return Ok(());
    }

    // Setup graceful shutdown handler
    let shutdown_signal = setup_shutdown_signal();

    let runner = PipelineRunner::new(profile, ProcessExecutor::new())?;

    // Dropping the run future kills the running stage program
    tokio::select! {
        result = runner.run() => {
            let report = result?;
            report.print_summary();
        }
        _ = shutdown_signal => {
            warn!("Received shutdown signal, stopping current stage...");
            anyhow::bail!("Run interrupted by shutdown signal");
        }
    }

    info!("Bench Runner finished");
    Ok(())
}

/// Setup Ctrl+C and SIGTERM signal handlers
///
/// SIGTERM is registered immediately, before any stage starts. A handler that
/// cannot be installed never fires.
fn setup_shutdown_signal() -> impl Future<Output = ()> {
    #[cfg(unix)]
    let terminate = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate());

    async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async move {
            match terminate {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to install SIGTERM handler");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }
    }
}
