//! Best-effort scan of what the stages have written so far.

use std::path::Path;

use contracts::RunLayout;
use serde::Serialize;
use walkdir::WalkDir;

/// Ingestion stage resume file, one sample id per line
pub const SUCCESS_RECORDS_FILE: &str = "success_records.txt";
/// Memory search output, one JSON object per line
pub const SEARCH_RESULTS_FILE: &str = "search_results.jsonl";

/// Counts of artifacts found under a run directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArtifactSummary {
    /// Conversations recorded as ingested
    pub ingested_records: usize,
    /// Entries in the memory search output
    pub search_results: usize,
    /// Files under the result directory, excluding the score directory
    pub result_files: usize,
    /// Files under the score directory
    pub score_files: usize,
}

impl ArtifactSummary {
    /// Scan a run layout. Missing or unreadable files count as zero.
    pub fn scan(layout: &RunLayout) -> Self {
        let result_dir = layout.resolved_result_dir();
        let score_dir = layout.resolved_score_dir();

        let result_files = WalkDir::new(&result_dir)
            .into_iter()
            .filter_entry(|entry| entry.path() != score_dir)
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                let name = entry.file_name();
                name != SUCCESS_RECORDS_FILE && name != SEARCH_RESULTS_FILE
            })
            .count();

        Self {
            ingested_records: count_lines(&result_dir.join(SUCCESS_RECORDS_FILE)),
            search_results: count_lines(&result_dir.join(SEARCH_RESULTS_FILE)),
            result_files,
            score_files: count_files(&score_dir),
        }
    }

    /// Nothing written yet
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn count_lines(path: &Path) -> usize {
    std::fs::read_to_string(path)
        .map(|content| content.lines().filter(|l| !l.trim().is_empty()).count())
        .unwrap_or(0)
}

fn count_files(dir: &Path) -> usize {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .count()
}
