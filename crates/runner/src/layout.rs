//! Run directory preparation

use contracts::RunLayout;
use tracing::debug;

use crate::RunnerError;

/// Create the result and score directories.
///
/// Idempotent: existing directories are left untouched.
pub fn prepare_layout(layout: &RunLayout) -> Result<(), RunnerError> {
    for dir in [layout.resolved_result_dir(), layout.resolved_score_dir()] {
        std::fs::create_dir_all(&dir).map_err(|e| RunnerError::layout(&dir, e))?;
        debug!(path = %dir.display(), "Run directory ready");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{MemoryLib, RunProfile};

    fn profile_in(dir: &std::path::Path) -> RunProfile {
        let mut profile = RunProfile::new(MemoryLib::Mem0, "m");
        profile.working_dir = Some(dir.to_path_buf());
        profile
    }

    #[test]
    fn test_prepare_creates_both_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = RunLayout::from_profile(&profile_in(tmp.path()));
        prepare_layout(&layout).unwrap();
        assert!(tmp.path().join("results/mem0_default_version").is_dir());
        assert!(tmp.path().join("results/mem0_default_version/score").is_dir());
    }

    #[test]
    fn test_prepare_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = RunLayout::from_profile(&profile_in(tmp.path()));
        prepare_layout(&layout).unwrap();
        std::fs::write(layout.resolved_result_dir().join("keep.txt"), "x").unwrap();
        prepare_layout(&layout).unwrap();
        assert!(layout.resolved_result_dir().join("keep.txt").exists());
    }

    #[test]
    fn test_prepare_fails_when_path_is_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("results"), "not a dir").unwrap();
        let layout = RunLayout::from_profile(&profile_in(tmp.path()));
        let err = prepare_layout(&layout).unwrap_err();
        assert!(matches!(err, RunnerError::Layout { .. }));
    }
}
