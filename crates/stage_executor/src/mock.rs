//! Mock 阶段执行器
//!
//! 用于单元测试的 mock 实现，记录每次调用并支持注入失败场景。

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use contracts::{ContractError, StageCommand, StageExecutor, StageKind, StageOutcome};
use tracing::instrument;

/// Mock 执行器配置
#[derive(Debug, Default, Clone)]
pub struct MockConfig {
    /// 应该以非零退出码结束的阶段
    pub fail_stages: HashMap<StageKind, i32>,
    /// 应该无法启动的阶段
    pub spawn_errors: Vec<StageKind>,
    /// 每次调用时检查是否存在的路径
    pub observed_paths: Vec<PathBuf>,
}

/// 一次被记录的调用
#[derive(Debug, Clone)]
pub struct Invocation {
    /// 收到的命令
    pub command: StageCommand,
    /// 调用时 `observed_paths` 中每个路径是否存在
    pub observed: Vec<(PathBuf, bool)>,
}

/// Mock 阶段执行器
pub struct MockExecutor {
    /// 配置（可注入失败场景）
    config: MockConfig,
    /// 按调用顺序记录
    invocations: Mutex<Vec<Invocation>>,
}

impl MockExecutor {
    /// 创建全部成功的 mock 执行器
    pub fn new() -> Self {
        Self::with_config(MockConfig::default())
    }

    /// 使用配置创建 mock 执行器
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            config,
            invocations: Mutex::new(Vec::new()),
        }
    }

    /// 指定阶段以给定退出码失败
    pub fn failing(stage: StageKind, exit_code: i32) -> Self {
        let mut config = MockConfig::default();
        config.fail_stages.insert(stage, exit_code);
        Self::with_config(config)
    }

    /// 所有记录的调用
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }

    /// 按顺序返回被调用过的阶段
    pub fn invoked_stages(&self) -> Vec<StageKind> {
        self.invocations
            .lock()
            .unwrap()
            .iter()
            .map(|inv| inv.command.stage)
            .collect()
    }

    /// 某阶段收到的命令
    pub fn command_for(&self, stage: StageKind) -> Option<StageCommand> {
        self.invocations
            .lock()
            .unwrap()
            .iter()
            .find(|inv| inv.command.stage == stage)
            .map(|inv| inv.command.clone())
    }

    fn record(&self, command: &StageCommand) {
        let observed = self
            .config
            .observed_paths
            .iter()
            .map(|path| (path.clone(), path.exists()))
            .collect();
        self.invocations.lock().unwrap().push(Invocation {
            command: command.clone(),
            observed,
        });
    }
}

impl Default for MockExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl StageExecutor for MockExecutor {
    fn name(&self) -> &str {
        "mock"
    }

    #[instrument(name = "mock_stage_execute", skip(self, command), fields(stage = %command.stage))]
    async fn execute(&self, command: &StageCommand) -> Result<StageOutcome, ContractError> {
        self.record(command);

        if self.config.spawn_errors.contains(&command.stage) {
            return Err(ContractError::stage_spawn(
                command.stage,
                &command.program,
                std::io::Error::new(std::io::ErrorKind::NotFound, "mock failure"),
            ));
        }

        Ok(match self.config.fail_stages.get(&command.stage) {
            Some(code) => StageOutcome::from_code(*code),
            None => StageOutcome::success(),
        })
    }
}
