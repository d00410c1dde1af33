//! Child-process executor
//!
//! Runs each stage as a real child process and waits for it to exit.

use contracts::{ContractError, StageCommand, StageExecutor, StageOutcome};
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

/// Executor that spawns stage programs as child processes.
///
/// The child inherits stdout/stderr and the runner's environment, with the
/// command's `env` entries layered on top. On unix each stage runs in its
/// own process group; if the execution future is dropped (e.g. on Ctrl+C)
/// the whole group is killed, so programs started by wrapper scripts go too.
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    pub fn new() -> Self {
        Self
    }

    fn build(command: &StageCommand) -> Command {
        let mut child = Command::new(&command.program);
        child
            .args(&command.args)
            .envs(&command.env)
            .kill_on_drop(true);
        #[cfg(unix)]
        child.process_group(0);
        if let Some(dir) = &command.working_dir {
            child.current_dir(dir);
        }
        child
    }
}

impl StageExecutor for ProcessExecutor {
    fn name(&self) -> &str {
        "process"
    }

    #[instrument(
        name = "process_stage_execute",
        skip(self, command),
        fields(stage = %command.stage, program = %command.program)
    )]
    async fn execute(&self, command: &StageCommand) -> Result<StageOutcome, ContractError> {
        debug!(command_line = %command.command_line(), "Spawning stage program");

        let mut child = Self::build(command)
            .spawn()
            .map_err(|e| ContractError::stage_spawn(command.stage, &command.program, e))?;

        info!(pid = ?child.id(), "Stage program started");

        #[cfg(unix)]
        let mut group = ProcessGroupGuard::new(child.id());

        let status = child.wait().await?;

        #[cfg(unix)]
        group.disarm();

        let outcome = StageOutcome {
            exit_code: status.code(),
        };

        if outcome.exit_code.is_none() {
            #[cfg(unix)]
            {
                use std::os::unix::process::ExitStatusExt;
                warn!(signal = ?status.signal(), "Stage program terminated by signal");
            }
            #[cfg(not(unix))]
            warn!("Stage program terminated without exit code");
        } else {
            debug!(exit_code = ?outcome.exit_code, "Stage program exited");
        }

        Ok(outcome)
    }
}

/// Kills a stage's process group when dropped, unless the stage already exited.
#[cfg(unix)]
struct ProcessGroupGuard {
    pgid: Option<i32>,
}

#[cfg(unix)]
impl ProcessGroupGuard {
    fn new(pid: Option<u32>) -> Self {
        Self {
            pgid: pid.and_then(|pid| i32::try_from(pid).ok()),
        }
    }

    fn disarm(&mut self) {
        self.pgid = None;
    }
}

#[cfg(unix)]
impl Drop for ProcessGroupGuard {
    fn drop(&mut self) {
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;

        if let Some(pgid) = self.pgid.take() {
            match killpg(Pid::from_raw(pgid), Signal::SIGKILL) {
                Ok(()) => warn!(pgid, "Stage process group killed"),
                Err(e) => debug!(pgid, error = %e, "Stage process group already gone"),
            }
        }
    }
}
