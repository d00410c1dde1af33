//! Pipeline runner - executes ingestion, generation and evaluation in order.
//!
//! The first stage that fails ends the run; later stages are never started.

use std::time::Instant;

use chrono::Utc;
use contracts::{RunLayout, RunProfile, StageExecutor};
use observability::{record_run_finished, record_stage_finished, record_stage_started};
use tracing::{error, info};

use crate::{prepare_layout, ArtifactSummary, RunReport, RunnerError, StagePlan};

/// Fail-fast three-stage runner
pub struct PipelineRunner<E> {
    profile: RunProfile,
    layout: RunLayout,
    plan: StagePlan,
    executor: E,
}

impl<E: StageExecutor> PipelineRunner<E> {
    /// Create a runner for a validated profile
    ///
    /// # Errors
    /// Returns an error if the stage plan cannot be built
    pub fn new(profile: RunProfile, executor: E) -> Result<Self, RunnerError> {
        let layout = RunLayout::from_profile(&profile);
        let plan = StagePlan::build(&profile, &layout)?;
        Ok(Self {
            profile,
            layout,
            plan,
            executor,
        })
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Run every stage to completion.
    ///
    /// Both run directories exist before the first stage starts.
    ///
    /// # Errors
    /// - Directory creation failure (no stage is started)
    /// - The first stage that cannot be started or exits non-zero
    pub async fn run(&self) -> Result<RunReport, RunnerError> {
        let started_at = Utc::now();
        let start = Instant::now();

        info!(
            profile = %self.profile.display_name(),
            executor = self.executor.name(),
            result_dir = %self.layout.result_dir.display(),
            "Starting benchmark run"
        );

        if let Err(e) = prepare_layout(&self.layout) {
            record_run_finished(false);
            return Err(e);
        }

        let mut report = RunReport::new(
            self.profile.display_name(),
            started_at,
            self.layout.result_dir.clone(),
        );

        for command in self.plan.commands() {
            let stage = command.stage;
            info!(
                stage = %stage,
                command_line = %command.command_line(),
                "Stage starting"
            );
            record_stage_started(stage.as_str());

            let stage_start = Instant::now();
            let result = self.executor.execute(command).await;
            let elapsed = stage_start.elapsed();

            let outcome = match result {
                Ok(outcome) => outcome,
                Err(source) => {
                    record_stage_finished(stage.as_str(), elapsed, false);
                    record_run_finished(false);
                    error!(stage = %stage, error = %source, "{} stage failed to start", stage);
                    return Err(RunnerError::StageStart { stage, source });
                }
            };

            record_stage_finished(stage.as_str(), elapsed, outcome.is_success());

            if !outcome.is_success() {
                record_run_finished(false);
                error!(
                    stage = %stage,
                    exit_code = ?outcome.exit_code,
                    "{} stage failed",
                    stage
                );
                return Err(RunnerError::StageFailed {
                    stage,
                    exit_code: outcome.exit_code,
                });
            }

            info!(
                stage = %stage,
                duration_secs = format!("{:.2}", elapsed.as_secs_f64()),
                "Stage completed"
            );
            report.push_stage(stage, outcome.exit_code, elapsed);
        }

        report.artifacts = ArtifactSummary::scan(&self.layout);
        report.duration_secs = start.elapsed().as_secs_f64();
        record_run_finished(true);

        info!(
            profile = %report.profile,
            duration_secs = format!("{:.2}", report.duration_secs),
            "Benchmark run completed"
        );

        Ok(report)
    }
}
