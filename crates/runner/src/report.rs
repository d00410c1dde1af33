//! Run report - what happened during a successful run.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use contracts::StageKind;
use serde::Serialize;

use crate::ArtifactSummary;

/// Completed stage
#[derive(Debug, Clone, Serialize)]
pub struct StageRecord {
    pub stage: StageKind,

    pub exit_code: Option<i32>,

    /// Wall-clock time of the stage program
    pub duration_secs: f64,
}

/// Report of a successful run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Profile display name
    pub profile: String,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// Result directory as handed to the stages
    pub result_dir: PathBuf,

    /// Completed stages, in execution order
    pub stages: Vec<StageRecord>,

    /// Total wall-clock time, directory setup included
    pub duration_secs: f64,

    /// Artifacts found after the last stage
    pub artifacts: ArtifactSummary,
}

impl RunReport {
    pub(crate) fn new(profile: String, started_at: DateTime<Utc>, result_dir: PathBuf) -> Self {
        Self {
            profile,
            started_at,
            result_dir,
            stages: Vec::with_capacity(StageKind::ORDERED.len()),
            duration_secs: 0.0,
            artifacts: ArtifactSummary::default(),
        }
    }

    pub(crate) fn push_stage(&mut self, stage: StageKind, exit_code: Option<i32>, duration: Duration) {
        self.stages.push(StageRecord {
            stage,
            exit_code,
            duration_secs: duration.as_secs_f64(),
        });
    }

    /// Record of a single stage
    pub fn stage(&self, stage: StageKind) -> Option<&StageRecord> {
        self.stages.iter().find(|record| record.stage == stage)
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                      Run Summary                             ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        println!("📊 Overview");
        println!("   ├─ Profile: {}", self.profile);
        println!("   ├─ Started: {}", self.started_at.to_rfc3339());
        println!("   ├─ Result dir: {}", self.result_dir.display());
        println!("   └─ Duration: {:.2}s", self.duration_secs);

        println!("\n🔁 Stages");
        for (i, record) in self.stages.iter().enumerate() {
            let prefix = if i == self.stages.len() - 1 { "└─" } else { "├─" };
            println!(
                "   {} {}: exit {} in {:.2}s",
                prefix,
                record.stage,
                record
                    .exit_code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                record.duration_secs
            );
        }

        println!("\n📁 Artifacts");
        println!("   ├─ Ingested records: {}", self.artifacts.ingested_records);
        println!("   ├─ Search results: {}", self.artifacts.search_results);
        println!("   ├─ Result files: {}", self.artifacts.result_files);
        println!("   └─ Score files: {}", self.artifacts.score_files);

        println!();
    }
}
