//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 内置 profile 快照测试
//! - 使用 shell 脚本作为阶段程序的 e2e 测试（仅 unix）

#[cfg(test)]
mod profile_tests {
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{RunLayout, StageKind};
    use runner::StagePlan;

    const MEMOS_PROFILE: &str = include_str!("../../../profiles/memos-api.toml");

    /// 内置 MemOS profile 生成的命令行
    #[test]
    fn test_memos_profile_command_lines() {
        let profile = ConfigLoader::load_from_str(MEMOS_PROFILE, ConfigFormat::Toml).unwrap();
        let layout = RunLayout::from_profile(&profile);
        let plan = StagePlan::build(&profile, &layout).unwrap();

        let generation = plan.command(StageKind::Generation).unwrap();
        assert_eq!(
            generation.command_line(),
            "bfcl generate --num-threads 5 --model gpt-4o-mini-2024-07-18-FC \
             --result-dir results/memos-api_default_version --test-category multi_turn --run-ids"
        );

        let evaluation = plan.command(StageKind::Evaluation).unwrap();
        assert!(evaluation.has_flag("--partial-eval"));
        assert_eq!(
            evaluation.flag_values("--score-dir"),
            vec!["results/memos-api_default_version/score"]
        );

        let env = &plan.command(StageKind::Ingestion).unwrap().env;
        assert_eq!(env.get("MEMOS_URL").map(String::as_str), Some("http://127.0.0.1:8001"));
        assert_eq!(env.get("TOP_K").map(String::as_str), Some("20"));
        assert_eq!(env.get("FRAME").map(String::as_str), Some("memos-api"));
    }
}

#[cfg(all(test, unix))]
mod e2e_tests {
    use std::path::Path;

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{RunProfile, StageKind};
    use runner::{PipelineRunner, RunnerError};
    use stage_executor::ProcessExecutor;

    /// 每个阶段把自身名称、参数与环境写入工作目录，然后以给定退出码结束
    fn load_profile(dir: &Path, codes: [i32; 3], extra: &str) -> RunProfile {
        let program = |name: &str, code: i32| {
            format!(
                r#"["sh", "-c", "echo {name} >> stages.log; echo \"$@\" > {name}.args; env > {name}.env; exit {code}", "{name}"]"#
            )
        };
        let content = format!(
            r#"
lib = "mem0"
model = "test-model"
version = "e2e"
top_k = 7
test_categories = ["multi_turn", "single_turn"]
working_dir = "{dir}"
{extra}

[programs]
ingestion = {ingestion}
generation = {generation}
evaluation = {evaluation}
"#,
            dir = dir.display(),
            ingestion = program("ingestion", codes[0]),
            generation = program("generation", codes[1]),
            evaluation = program("evaluation", codes[2]),
        );
        ConfigLoader::load_from_str(&content, ConfigFormat::Toml).unwrap()
    }

    fn read(dir: &Path, file: &str) -> String {
        std::fs::read_to_string(dir.join(file)).unwrap_or_default()
    }

    fn stages_log(dir: &Path) -> Vec<String> {
        read(dir, "stages.log").lines().map(str::to_string).collect()
    }

    /// End-to-end test: ConfigLoader -> PipelineRunner -> ProcessExecutor -> sh
    #[tokio::test]
    async fn test_e2e_all_stages_succeed() {
        let tmp = tempfile::tempdir().unwrap();
        let profile = load_profile(tmp.path(), [0, 0, 0], "");
        let runner = PipelineRunner::new(profile, ProcessExecutor::new()).unwrap();

        let report = runner.run().await.unwrap();

        assert_eq!(stages_log(tmp.path()), ["ingestion", "generation", "evaluation"]);
        assert_eq!(report.stages.len(), 3);
        assert!(tmp.path().join("results/mem0_e2e").is_dir());
        assert!(tmp.path().join("results/mem0_e2e/score").is_dir());

        assert_eq!(
            read(tmp.path(), "ingestion.args").trim(),
            "--lib mem0 --workers 5 --data-dir data/bfcl-v4 --record-dir results/mem0_e2e"
        );
        assert_eq!(
            read(tmp.path(), "evaluation.args").trim(),
            "--model test-model --result-dir results/mem0_e2e --score-dir results/mem0_e2e/score \
             --test-category multi_turn single_turn"
        );
    }

    #[tokio::test]
    async fn test_e2e_directories_exist_before_ingestion() {
        let tmp = tempfile::tempdir().unwrap();
        let mut profile = load_profile(tmp.path(), [0, 0, 0], "");
        profile.programs.ingestion = vec![
            "sh".to_string(),
            "-c".to_string(),
            "test -d results/mem0_e2e/score".to_string(),
        ];
        let runner = PipelineRunner::new(profile, ProcessExecutor::new()).unwrap();

        assert!(runner.run().await.is_ok());
    }

    #[tokio::test]
    async fn test_e2e_stage_environment() {
        let tmp = tempfile::tempdir().unwrap();
        let extra = r#"
[service]
url = "http://127.0.0.1:8001"

[env]
OPENAI_BASE_URL = "http://localhost:9000"
"#;
        let profile = load_profile(tmp.path(), [0, 0, 0], extra);
        let runner = PipelineRunner::new(profile, ProcessExecutor::new()).unwrap();
        runner.run().await.unwrap();

        for stage in StageKind::ORDERED {
            let env = read(tmp.path(), &format!("{}.env", stage.as_str()));
            let lines: Vec<&str> = env.lines().collect();
            assert!(lines.contains(&"VERSION=e2e"), "{stage}: {env}");
            assert!(lines.contains(&"TOP_K=7"));
            assert!(lines.contains(&"FRAME=mem0"));
            assert!(lines.contains(&"MEMOS_URL=http://127.0.0.1:8001"));
            assert!(lines.contains(&"OPENAI_BASE_URL=http://localhost:9000"));
        }

        // The runner's own environment is left alone
        assert!(std::env::var("FRAME").map_or(true, |v| v != "mem0"));
    }

    #[tokio::test]
    async fn test_e2e_ingestion_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let profile = load_profile(tmp.path(), [1, 0, 0], "");
        let runner = PipelineRunner::new(profile, ProcessExecutor::new()).unwrap();

        let err = runner.run().await.unwrap_err();

        assert_eq!(err.to_string(), "Ingestion stage failed (exit code 1)");
        assert_eq!(stages_log(tmp.path()), ["ingestion"]);
    }

    #[tokio::test]
    async fn test_e2e_generation_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let profile = load_profile(tmp.path(), [0, 4, 0], "");
        let runner = PipelineRunner::new(profile, ProcessExecutor::new()).unwrap();

        let err = runner.run().await.unwrap_err();

        assert!(matches!(
            err,
            RunnerError::StageFailed {
                stage: StageKind::Generation,
                exit_code: Some(4)
            }
        ));
        assert_eq!(stages_log(tmp.path()), ["ingestion", "generation"]);
        // Completed stages keep their artifacts
        assert!(tmp.path().join("ingestion.args").exists());
    }

    #[tokio::test]
    async fn test_e2e_missing_program() {
        let tmp = tempfile::tempdir().unwrap();
        let mut profile = load_profile(tmp.path(), [0, 0, 0], "");
        profile.programs.generation = vec!["bench-runner-no-such-program".to_string()];
        let runner = PipelineRunner::new(profile, ProcessExecutor::new()).unwrap();

        let err = runner.run().await.unwrap_err();

        assert_eq!(err.stage(), Some(StageKind::Generation));
        assert_eq!(stages_log(tmp.path()), ["ingestion"]);
    }

    #[tokio::test]
    async fn test_e2e_variant_flags() {
        let tmp = tempfile::tempdir().unwrap();
        let extra = r#"
[variant]
run_ids = true
partial_eval = true
"#;
        let profile = load_profile(tmp.path(), [0, 0, 0], extra);
        let runner = PipelineRunner::new(profile, ProcessExecutor::new()).unwrap();
        runner.run().await.unwrap();

        let generation = read(tmp.path(), "generation.args");
        assert!(generation.trim_end().ends_with("--run-ids"));
        assert!(!generation.contains("--allow-overwrite"));
        assert!(read(tmp.path(), "evaluation.args")
            .trim_end()
            .ends_with("--partial-eval"));
    }

    #[tokio::test]
    async fn test_e2e_rerun_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let profile = load_profile(tmp.path(), [0, 0, 0], "");

        let first = PipelineRunner::new(profile.clone(), ProcessExecutor::new()).unwrap();
        first.run().await.unwrap();
        let second = PipelineRunner::new(profile, ProcessExecutor::new()).unwrap();
        second.run().await.unwrap();

        assert_eq!(stages_log(tmp.path()).len(), 6);
    }
}
