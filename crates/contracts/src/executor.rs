//! StageExecutor trait - runner output interface
//!
//! Abstracts how a stage program is run so the runner can be driven by real
//! child processes or by scripted outcomes.

use crate::{ContractError, StageCommand, StageOutcome};

/// Stage execution trait
///
/// Implementations must not return before the stage program has terminated.
#[trait_variant::make(StageExecutor: Send)]
pub trait LocalStageExecutor {
    /// Executor name (used for logging)
    fn name(&self) -> &str;

    /// Run one stage to completion
    ///
    /// A non-zero exit is reported through `StageOutcome`, not as an error.
    ///
    /// # Errors
    /// Returns an error only when the program could not be started or awaited
    async fn execute(&self, command: &StageCommand) -> Result<StageOutcome, ContractError>;
}
