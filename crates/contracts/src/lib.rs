//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the runner.
//! Business crates depend on this crate only; reverse dependencies are prohibited.
//!
//! ## Run Model
//! - A `RunProfile` is fixed for the duration of one run
//! - Stages run strictly in `StageKind::ORDERED` order
//! - A stage succeeds only on exit code 0

mod error;
mod executor;
mod layout;
mod profile;
mod stage;

pub use error::*;
pub use executor::{LocalStageExecutor, StageExecutor};
pub use layout::*;
pub use profile::*;
pub use stage::*;
