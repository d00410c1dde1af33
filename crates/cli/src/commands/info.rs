//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::{RunLayout, RunProfile, StageCommand};
use runner::{ArtifactSummary, StagePlan};
use serde::Serialize;
use tracing::info;

use super::{load_profile, print_plan, print_profile};
use crate::cli::InfoArgs;

/// Profile info for JSON output
#[derive(Serialize)]
struct ProfileInfo<'a> {
    profile: &'a RunProfile,
    result_dir: String,
    score_dir: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    commands: Option<&'a [StageCommand]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    artifacts: Option<ArtifactSummary>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(profile = %args.profile.display(), "Loading profile info");

    let profile = load_profile(&args.profile)?;
    let layout = RunLayout::from_profile(&profile);
    let plan = StagePlan::build(&profile, &layout)?;
    let artifacts = args.artifacts.then(|| ArtifactSummary::scan(&layout));

    if args.json {
        let info = ProfileInfo {
            profile: &profile,
            result_dir: layout.result_dir.display().to_string(),
            score_dir: layout.score_dir.display().to_string(),
            commands: args.commands.then(|| plan.commands()),
            artifacts,
        };
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize profile info")?;
        println!("{}", json);
        return Ok(());
    }

    print_profile(&profile, &layout);

    if args.commands {
        print_plan(&plan);
    }

    if let Some(artifacts) = artifacts {
        print_artifacts(&artifacts);
    }

    Ok(())
}

fn print_artifacts(artifacts: &ArtifactSummary) {
    println!("Artifacts:");
    if artifacts.is_empty() {
        println!("  (none yet)");
    } else {
        println!("  Ingested records: {}", artifacts.ingested_records);
        println!("  Search results: {}", artifacts.search_results);
        println!("  Result files: {}", artifacts.result_files);
        println!("  Score files: {}", artifacts.score_files);
    }
    println!();
}
