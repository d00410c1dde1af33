//! Stage contracts - what the runner hands to an executor and gets back.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Pipeline stage, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Ingestion,
    Generation,
    Evaluation,
}

impl StageKind {
    /// Fixed execution order
    pub const ORDERED: [StageKind; 3] = [
        StageKind::Ingestion,
        StageKind::Generation,
        StageKind::Evaluation,
    ];

    /// Lowercase identifier (metrics labels, JSON)
    pub fn as_str(&self) -> &'static str {
        match self {
            StageKind::Ingestion => "ingestion",
            StageKind::Generation => "generation",
            StageKind::Evaluation => "evaluation",
        }
    }

    /// Capitalized label used in diagnostics
    pub fn label(&self) -> &'static str {
        match self {
            StageKind::Ingestion => "Ingestion",
            StageKind::Generation => "Generation",
            StageKind::Evaluation => "Evaluation",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fully resolved invocation of one stage program
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageCommand {
    /// Stage this command implements
    pub stage: StageKind,

    /// Executable (first element of the configured argv prefix)
    pub program: String,

    /// Remaining prefix elements followed by stage flags
    pub args: Vec<String>,

    /// Variables set on the child in addition to the inherited environment
    pub env: BTreeMap<String, String>,

    /// Child working directory (None = inherit)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
}

impl StageCommand {
    /// Whether `flag` appears verbatim among the arguments
    pub fn has_flag(&self, flag: &str) -> bool {
        self.args.iter().any(|arg| arg == flag)
    }

    /// Values following `flag`, up to the next `--` option
    pub fn flag_values(&self, flag: &str) -> Vec<&str> {
        self.args
            .iter()
            .skip_while(|arg| arg.as_str() != flag)
            .skip(1)
            .take_while(|arg| !arg.starts_with("--"))
            .map(String::as_str)
            .collect()
    }

    /// Printable command line (for echo and dry runs)
    pub fn command_line(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|part| shell_quote(part))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn shell_quote(part: &str) -> String {
    let plain = !part.is_empty()
        && part
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,@+".contains(c));
    if plain {
        part.to_string()
    } else {
        format!("'{}'", part.replace('\'', r"'\''"))
    }
}

/// Termination status of one stage program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageOutcome {
    /// Exit code (None = terminated by a signal)
    pub exit_code: Option<i32>,
}

impl StageOutcome {
    /// Zero exit
    pub fn success() -> Self {
        Self { exit_code: Some(0) }
    }

    pub fn from_code(code: i32) -> Self {
        Self {
            exit_code: Some(code),
        }
    }

    /// Killed without an exit code
    pub fn terminated() -> Self {
        Self { exit_code: None }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == Some(0)
    }
}
