//! # Stage Executor
//!
//! Stage program execution module.
//!
//! Responsibilities:
//! - Run stage programs as child processes with an explicit environment
//! - Report termination status as `StageOutcome`
//! - Provide a scripted mock for orchestration tests

pub mod mock;
pub mod process;

pub use contracts::{StageCommand, StageExecutor, StageOutcome};
pub use mock::{Invocation, MockConfig, MockExecutor};
pub use process::ProcessExecutor;
