//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::RunProfile;
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    profile_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ProfileSummary>,
}

#[derive(Serialize)]
struct ProfileSummary {
    lib: String,
    frame: String,
    model: String,
    version: String,
    run_dir: String,
    test_categories: Vec<String>,
}

impl ProfileSummary {
    fn from_profile(profile: &RunProfile) -> Self {
        Self {
            lib: profile.lib.to_string(),
            frame: profile.frame().to_string(),
            model: profile.model.clone(),
            version: profile.version.clone(),
            run_dir: profile.run_dir_name(),
            test_categories: profile.test_categories.clone(),
        }
    }
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(profile = %args.profile.display(), "Validating profile");

    let result = validate_profile(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Profile validation failed")
    }
}

fn validate_profile(args: &ValidateArgs) -> ValidationResult {
    let profile_path = args.profile.display().to_string();

    // Check file exists
    if !args.profile.exists() {
        return ValidationResult {
            valid: false,
            profile_path,
            error: Some(format!("File not found: {}", args.profile.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.profile) {
        Ok(profile) => {
            let warnings = config_loader::ConfigLoader::warnings(&profile);
            ValidationResult {
                valid: true,
                profile_path,
                error: None,
                warnings: (!warnings.is_empty()).then_some(warnings),
                summary: Some(ProfileSummary::from_profile(&profile)),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            profile_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Profile is valid: {}", result.profile_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Lib: {}", summary.lib);
            println!("  Frame: {}", summary.frame);
            println!("  Model: {}", summary.model);
            println!("  Version: {}", summary.version);
            println!("  Run dir: {}", summary.run_dir);
            println!("  Test categories: {}", summary.test_categories.join(", "));
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Profile is invalid: {}", result.profile_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
