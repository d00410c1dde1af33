//! RunLayout - directories a run writes into

use std::path::{Path, PathBuf};

use crate::RunProfile;

/// Name of the evaluation output subdirectory
pub const SCORE_DIR_NAME: &str = "score";

/// Run directory pair derived from a profile.
///
/// `result_dir` and `score_dir` are the paths handed to stage programs; they
/// are relative to the stage working directory when relative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLayout {
    /// `{results_root}/{lib}_{version}`
    pub result_dir: PathBuf,

    /// `{result_dir}/score`
    pub score_dir: PathBuf,

    base_dir: Option<PathBuf>,
}

impl RunLayout {
    /// Derive the layout of a profile
    pub fn from_profile(profile: &RunProfile) -> Self {
        let result_dir = profile.results_root.join(profile.run_dir_name());
        let score_dir = result_dir.join(SCORE_DIR_NAME);
        Self {
            result_dir,
            score_dir,
            base_dir: profile.working_dir.clone(),
        }
    }

    /// Resolve a stage-relative path against the stage working directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Result directory as seen from the runner
    pub fn resolved_result_dir(&self) -> PathBuf {
        self.resolve(&self.result_dir)
    }

    /// Score directory as seen from the runner
    pub fn resolved_score_dir(&self) -> PathBuf {
        self.resolve(&self.score_dir)
    }
}
