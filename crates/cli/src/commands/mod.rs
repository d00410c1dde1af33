//! Command implementations.

mod info;
mod run;
mod validate;

pub use info::run_info;
pub use run::run_pipeline;
pub use validate::run_validate;

use anyhow::{Context, Result};
use contracts::{RunLayout, RunProfile};
use runner::StagePlan;
use std::path::Path;

/// Load and validate a profile, with the path in the error context
fn load_profile(path: &Path) -> Result<RunProfile> {
    if !path.exists() {
        anyhow::bail!("Profile not found: {}", path.display());
    }

    config_loader::ConfigLoader::load_from_path(path)
        .with_context(|| format!("Failed to load profile from {}", path.display()))
}

/// Print every configuration value
fn print_profile(profile: &RunProfile, layout: &RunLayout) {
    println!("\n=== Run Configuration ===\n");
    println!("Profile: {}", profile.display_name());
    println!("  Lib: {}", profile.lib);
    println!("  Frame: {}", profile.frame());
    println!("  Model: {}", profile.model);
    println!("  Workers: {}", profile.workers);
    println!("  Version: {}", profile.version);
    println!("  Top-K: {}", profile.top_k);
    println!("  Data dir: {}", profile.data_dir.display());
    println!("  Test categories: {}", profile.test_categories.join(", "));
    if let Some(ref dir) = profile.working_dir {
        println!("  Working dir: {}", dir.display());
    }

    println!("\nDirectories:");
    println!("  Results: {}", layout.result_dir.display());
    println!("  Scores: {}", layout.score_dir.display());

    println!("\nService:");
    match profile.service.url {
        Some(ref url) => println!("  {}: {}", profile.service.env_key, url),
        None => println!("  (none)"),
    }

    println!("\nVariant:");
    println!("  Run ids: {}", profile.variant.run_ids);
    println!("  Partial eval: {}", profile.variant.partial_eval);
    println!("  Allow overwrite: {}", profile.variant.allow_overwrite);

    if !profile.env.is_empty() {
        println!("\nExtra environment ({}):", profile.env.len());
        for (key, value) in &profile.env {
            println!("  {key}={value}");
        }
    }

    println!();
}

/// Print the resolved stage command lines
fn print_plan(plan: &StagePlan) {
    println!("Stages:");
    for command in plan.commands() {
        println!("  [{}] {}", command.stage, command.command_line());
    }
    println!();
}
