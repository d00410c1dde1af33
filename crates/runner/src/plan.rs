//! Stage planning - turns a profile into the three stage command lines.

use contracts::{ContractError, RunLayout, RunProfile, StageCommand, StageKind};

/// Restricts generation to the configured run identifiers
pub const FLAG_RUN_IDS: &str = "--run-ids";
/// Lets generation overwrite existing results
pub const FLAG_ALLOW_OVERWRITE: &str = "--allow-overwrite";
/// Scores only a subset of generated results
pub const FLAG_PARTIAL_EVAL: &str = "--partial-eval";

/// Resolved commands for every stage, in execution order
#[derive(Debug, Clone)]
pub struct StagePlan {
    commands: Vec<StageCommand>,
}

impl StagePlan {
    /// Build the plan for a profile.
    ///
    /// # Errors
    /// Returns a validation error if a stage program argv is empty
    pub fn build(profile: &RunProfile, layout: &RunLayout) -> Result<Self, ContractError> {
        let commands = StageKind::ORDERED
            .into_iter()
            .map(|stage| build_command(stage, profile, layout))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { commands })
    }

    /// Commands in execution order
    pub fn commands(&self) -> &[StageCommand] {
        &self.commands
    }

    /// Command of a single stage
    pub fn command(&self, stage: StageKind) -> Option<&StageCommand> {
        self.commands.iter().find(|cmd| cmd.stage == stage)
    }
}

fn build_command(
    stage: StageKind,
    profile: &RunProfile,
    layout: &RunLayout,
) -> Result<StageCommand, ContractError> {
    let (field, argv) = match stage {
        StageKind::Ingestion => ("programs.ingestion", &profile.programs.ingestion),
        StageKind::Generation => ("programs.generation", &profile.programs.generation),
        StageKind::Evaluation => ("programs.evaluation", &profile.programs.evaluation),
    };
    let (program, prefix) = argv
        .split_first()
        .ok_or_else(|| ContractError::config_validation(field, "executable cannot be empty"))?;

    let mut args = prefix.to_vec();
    match stage {
        StageKind::Ingestion => push_ingestion_args(&mut args, profile, layout),
        StageKind::Generation => push_generation_args(&mut args, profile, layout),
        StageKind::Evaluation => push_evaluation_args(&mut args, profile, layout),
    }

    Ok(StageCommand {
        stage,
        program: program.clone(),
        args,
        env: profile.stage_env(),
        working_dir: profile.working_dir.clone(),
    })
}

fn push_ingestion_args(args: &mut Vec<String>, profile: &RunProfile, layout: &RunLayout) {
    args.extend([
        "--lib".to_string(),
        profile.lib.to_string(),
        "--workers".to_string(),
        profile.workers.to_string(),
        "--data-dir".to_string(),
        profile.data_dir.display().to_string(),
        "--record-dir".to_string(),
        layout.result_dir.display().to_string(),
    ]);
}

fn push_generation_args(args: &mut Vec<String>, profile: &RunProfile, layout: &RunLayout) {
    args.extend([
        "--num-threads".to_string(),
        profile.workers.to_string(),
        "--model".to_string(),
        profile.model.clone(),
        "--result-dir".to_string(),
        layout.result_dir.display().to_string(),
    ]);
    push_test_categories(args, profile);
    if profile.variant.run_ids {
        args.push(FLAG_RUN_IDS.to_string());
    }
    if profile.variant.allow_overwrite {
        args.push(FLAG_ALLOW_OVERWRITE.to_string());
    }
}

fn push_evaluation_args(args: &mut Vec<String>, profile: &RunProfile, layout: &RunLayout) {
    args.extend([
        "--model".to_string(),
        profile.model.clone(),
        "--result-dir".to_string(),
        layout.result_dir.display().to_string(),
        "--score-dir".to_string(),
        layout.score_dir.display().to_string(),
    ]);
    push_test_categories(args, profile);
    if profile.variant.partial_eval {
        args.push(FLAG_PARTIAL_EVAL.to_string());
    }
}

fn push_test_categories(args: &mut Vec<String>, profile: &RunProfile) {
    args.push("--test-category".to_string());
    args.extend(profile.test_categories.iter().cloned());
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::MemoryLib;

    fn plan_for(profile: &RunProfile) -> StagePlan {
        StagePlan::build(profile, &RunLayout::from_profile(profile)).unwrap()
    }

    #[test]
    fn test_plan_order() {
        let plan = plan_for(&RunProfile::new(MemoryLib::Mem0, "gpt-4o-mini"));
        let stages: Vec<_> = plan.commands().iter().map(|c| c.stage).collect();
        assert_eq!(stages, StageKind::ORDERED.to_vec());
    }

    #[test]
    fn test_ingestion_command() {
        let mut profile = RunProfile::new(MemoryLib::Mem0, "gpt-4o-mini");
        profile.workers = 12;
        let plan = plan_for(&profile);
        let cmd = plan.command(StageKind::Ingestion).unwrap();
        assert_eq!(cmd.program, "python");
        assert_eq!(
            cmd.args,
            vec![
                "bfcl_ingestion.py",
                "--lib",
                "mem0",
                "--workers",
                "12",
                "--data-dir",
                "data/bfcl-v4",
                "--record-dir",
                "results/mem0_default_version",
            ]
        );
    }

    #[test]
    fn test_generation_command_without_variant_flags() {
        let plan = plan_for(&RunProfile::new(MemoryLib::Mem0, "gpt-4o-mini"));
        let cmd = plan.command(StageKind::Generation).unwrap();
        assert_eq!(cmd.program, "bfcl");
        assert_eq!(cmd.args[0], "generate");
        assert_eq!(cmd.flag_values("--num-threads"), vec!["5"]);
        assert_eq!(cmd.flag_values("--model"), vec!["gpt-4o-mini"]);
        assert_eq!(
            cmd.flag_values("--result-dir"),
            vec!["results/mem0_default_version"]
        );
        assert_eq!(
            cmd.flag_values("--test-category"),
            vec!["single_turn", "multi_turn"]
        );
        assert!(!cmd.has_flag(FLAG_RUN_IDS));
        assert!(!cmd.has_flag(FLAG_ALLOW_OVERWRITE));
    }

    #[test]
    fn test_variant_flags_forwarded_to_their_stage_only() {
        let mut profile = RunProfile::new(MemoryLib::MemosApi, "gpt-4o-mini");
        profile.variant.run_ids = true;
        profile.variant.partial_eval = true;
        let plan = plan_for(&profile);

        let generation = plan.command(StageKind::Generation).unwrap();
        let evaluation = plan.command(StageKind::Evaluation).unwrap();
        assert!(generation.has_flag(FLAG_RUN_IDS));
        assert!(!generation.has_flag(FLAG_PARTIAL_EVAL));
        assert!(evaluation.has_flag(FLAG_PARTIAL_EVAL));
        assert!(!evaluation.has_flag(FLAG_RUN_IDS));
        assert!(!plan
            .command(StageKind::Ingestion)
            .unwrap()
            .args
            .iter()
            .any(|a| a == FLAG_RUN_IDS || a == FLAG_PARTIAL_EVAL));
    }

    #[test]
    fn test_evaluation_command() {
        let plan = plan_for(&RunProfile::new(MemoryLib::Mem0, "gpt-4o-mini"));
        let cmd = plan.command(StageKind::Evaluation).unwrap();
        assert_eq!(cmd.args[0], "evaluate");
        assert_eq!(
            cmd.flag_values("--score-dir"),
            vec!["results/mem0_default_version/score"]
        );
        assert!(!cmd.has_flag(FLAG_PARTIAL_EVAL));
    }

    #[test]
    fn test_every_stage_gets_the_same_env() {
        let mut profile = RunProfile::new(MemoryLib::MemosApi, "gpt-4o-mini");
        profile.service.url = Some("http://127.0.0.1:8001".into());
        let plan = plan_for(&profile);
        let expected = profile.stage_env();
        for cmd in plan.commands() {
            assert_eq!(cmd.env, expected);
        }
    }

    #[test]
    fn test_custom_program_prefix() {
        let mut profile = RunProfile::new(MemoryLib::Mem0, "gpt-4o-mini");
        profile.programs.evaluation = vec!["./eval.sh".into()];
        let plan = plan_for(&profile);
        let cmd = plan.command(StageKind::Evaluation).unwrap();
        assert_eq!(cmd.program, "./eval.sh");
        assert_eq!(cmd.args[0], "--model");
    }

    #[test]
    fn test_empty_program_is_rejected() {
        let mut profile = RunProfile::new(MemoryLib::Mem0, "gpt-4o-mini");
        profile.programs.ingestion.clear();
        let result = StagePlan::build(&profile, &RunLayout::from_profile(&profile));
        assert!(matches!(result, Err(ContractError::ConfigValidation { .. })));
    }
}
