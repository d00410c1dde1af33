//! # Runner
//!
//! Benchmark pipeline orchestration.
//!
//! Responsibilities:
//! - Derive the three stage command lines from a `RunProfile`
//! - Create the result and score directories before any stage runs
//! - Run ingestion, generation and evaluation in order, stopping at the first failure
//! - Report per-stage timings and the artifacts left behind
//!
//! ## Usage Example
//!
//! ```ignore
//! use runner::PipelineRunner;
//! use stage_executor::ProcessExecutor;
//!
//! let runner = PipelineRunner::new(profile, ProcessExecutor::new())?;
//! let report = runner.run().await?;
//! report.print_summary();
//! ```

mod artifacts;
mod error;
mod layout;
mod plan;
mod report;
mod runner;

pub use artifacts::{ArtifactSummary, SEARCH_RESULTS_FILE, SUCCESS_RECORDS_FILE};
pub use error::RunnerError;
pub use layout::prepare_layout;
pub use plan::{StagePlan, FLAG_ALLOW_OVERWRITE, FLAG_PARTIAL_EVAL, FLAG_RUN_IDS};
pub use report::{RunReport, StageRecord};
pub use runner::PipelineRunner;
