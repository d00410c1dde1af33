//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use contracts::{MemoryLib, RunProfile};
use std::path::PathBuf;

/// Bench Runner - memory benchmark pipeline runner
#[derive(Parser, Debug)]
#[command(
    name = "bench-runner",
    author,
    version,
    about = "Memory benchmark pipeline runner",
    long_about = "Runs the ingestion, generation and evaluation programs of a memory benchmark\n\
                  in order for one run profile, stopping at the first stage that fails."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "BENCH_RUNNER_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "BENCH_RUNNER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the three benchmark stages
    Run(RunArgs),

    /// Validate a run profile without running anything
    Validate(ValidateArgs),

    /// Display the resolved run profile
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to run profile (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "profile.toml",
        env = "BENCH_RUNNER_PROFILE"
    )]
    pub profile: PathBuf,

    #[command(flatten)]
    pub overrides: ProfileOverrides,

    /// Print the configuration and stage command lines, then exit without running
    #[arg(long)]
    pub dry_run: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "BENCH_RUNNER_METRICS_PORT")]
    pub metrics_port: u16,
}

impl RunArgs {
    pub fn metrics_port(&self) -> Option<u16> {
        (self.metrics_port != 0).then_some(self.metrics_port)
    }
}

/// Profile values that can be replaced from the command line
#[derive(Args, Debug, Clone, Default)]
pub struct ProfileOverrides {
    /// Override memory library
    #[arg(long)]
    pub lib: Option<MemoryLib>,

    /// Override frame exported to the stages
    #[arg(long)]
    pub frame: Option<MemoryLib>,

    /// Override model identifier
    #[arg(long)]
    pub model: Option<String>,

    /// Override worker / thread count
    #[arg(long)]
    pub workers: Option<u32>,

    /// Override version tag (also renames the run directory)
    #[arg(long = "version", value_name = "VERSION")]
    pub run_version: Option<String>,

    /// Override retrieval top-k
    #[arg(long)]
    pub top_k: Option<u32>,

    /// Override service URL
    #[arg(long, env = "BENCH_RUNNER_SERVICE_URL")]
    pub service_url: Option<String>,

    /// Restrict generation to the configured run ids
    #[arg(long)]
    pub run_ids: bool,

    /// Score only a subset of generated results
    #[arg(long)]
    pub partial_eval: bool,

    /// Let generation overwrite existing results
    #[arg(long)]
    pub allow_overwrite: bool,
}

impl ProfileOverrides {
    /// Apply every override that was given. Flags only ever switch on.
    pub fn apply(&self, profile: &mut RunProfile) {
        if let Some(lib) = self.lib {
            profile.lib = lib;
        }
        if let Some(frame) = self.frame {
            profile.frame = Some(frame);
        }
        if let Some(ref model) = self.model {
            profile.model = model.clone();
        }
        if let Some(workers) = self.workers {
            profile.workers = workers;
        }
        if let Some(ref version) = self.run_version {
            profile.version = version.clone();
        }
        if let Some(top_k) = self.top_k {
            profile.top_k = top_k;
        }
        if let Some(ref url) = self.service_url {
            profile.service.url = Some(url.clone());
        }
        profile.variant.run_ids |= self.run_ids;
        profile.variant.partial_eval |= self.partial_eval;
        profile.variant.allow_overwrite |= self.allow_overwrite;
    }
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to run profile to validate
    #[arg(
        short,
        long,
        default_value = "profile.toml",
        env = "BENCH_RUNNER_PROFILE"
    )]
    pub profile: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to run profile
    #[arg(
        short,
        long,
        default_value = "profile.toml",
        env = "BENCH_RUNNER_PROFILE"
    )]
    pub profile: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show the resolved stage command lines
    #[arg(long)]
    pub commands: bool,

    /// Scan the run directory for artifacts
    #[arg(long)]
    pub artifacts: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => observability::LogFormat::Json,
            LogFormat::Pretty => observability::LogFormat::Pretty,
            LogFormat::Compact => observability::LogFormat::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_overrides() {
        let cli = Cli::parse_from([
            "bench-runner",
            "run",
            "--profile",
            "profiles/mem0.toml",
            "--lib",
            "memos-api",
            "--version",
            "v2",
            "--top-k",
            "20",
            "--run-ids",
        ]);
        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.overrides.lib, Some(MemoryLib::MemosApi));
        assert_eq!(args.overrides.run_version.as_deref(), Some("v2"));
        assert_eq!(args.metrics_port(), None);

        let mut profile = RunProfile::new(MemoryLib::Mem0, "gpt-4o-mini");
        args.overrides.apply(&mut profile);
        assert_eq!(profile.lib, MemoryLib::MemosApi);
        assert_eq!(profile.version, "v2");
        assert_eq!(profile.top_k, 20);
        assert!(profile.variant.run_ids);
        assert!(!profile.variant.partial_eval);
    }

    #[test]
    fn test_unknown_lib_is_rejected() {
        let result = Cli::try_parse_from(["bench-runner", "run", "--lib", "redis"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_flags_do_not_clear_profile_variant() {
        let mut profile = RunProfile::new(MemoryLib::MemosApi, "gpt-4o-mini");
        profile.variant.partial_eval = true;
        ProfileOverrides::default().apply(&mut profile);
        assert!(profile.variant.partial_eval);
    }
}
