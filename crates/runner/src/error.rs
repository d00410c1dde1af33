//! Runner error types

use std::path::PathBuf;

use contracts::{ContractError, StageKind};
use thiserror::Error;

/// Runner-specific errors
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Run directory could not be created
    #[error("failed to create run directory {}: {source}", .path.display())]
    Layout {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stage program exited non-zero or was killed
    #[error("{stage} stage failed ({})", describe_exit(.exit_code))]
    StageFailed {
        stage: StageKind,
        exit_code: Option<i32>,
    },

    /// Stage program could not be started
    #[error("{stage} stage failed: {source}")]
    StageStart {
        stage: StageKind,
        #[source]
        source: ContractError,
    },

    /// Invalid profile or plan
    #[error(transparent)]
    Contract(#[from] ContractError),
}

impl RunnerError {
    /// Create a layout error
    pub fn layout(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Layout {
            path: path.into(),
            source,
        }
    }

    /// Stage that failed, if the error came from a stage
    pub fn stage(&self) -> Option<StageKind> {
        match self {
            Self::StageFailed { stage, .. } | Self::StageStart { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

fn describe_exit(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}
