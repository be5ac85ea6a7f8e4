use async_trait::async_trait;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;

use super::error::ExecutorError;
use super::traits::CommandExecutor;
use super::types::{CommandOutput, CommandResult};

/// Runs command lines through `sh -c` on the local host.
///
/// The rendered commands carry their own quoting, pipes and `$( )`
/// substitutions, exactly as an operator would type them, so they need a
/// shell rather than direct argv execution.
pub struct LocalCommandExecutor;

impl Default for LocalCommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalCommandExecutor {
    pub fn new() -> Self {
        Self
    }

    fn shell(command: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    }
}

#[async_trait]
impl CommandExecutor for LocalCommandExecutor {
    async fn execute_command(&mut self, command: &str) -> Result<CommandResult, ExecutorError> {
        if command.trim().is_empty() {
            return Err(ExecutorError::Other("No command provided".to_string()));
        }

        let start_time = Instant::now();

        let output = Self::shell(command)
            .output()
            .await
            .map_err(|e| ExecutorError::Launch(e.to_string()))?;

        let mut cmd_output = CommandOutput::new();
        cmd_output.stdout = output.stdout;
        cmd_output.stderr = output.stderr;
        cmd_output.exit_code = output.status.code().unwrap_or_default() as u32;
        cmd_output.duration = start_time.elapsed();

        Ok(CommandResult {
            command: command.to_string(),
            output: cmd_output,
        })
    }

    async fn stream_command(&mut self, command: &str) -> Result<u32, ExecutorError> {
        if command.trim().is_empty() {
            return Err(ExecutorError::Other("No command provided".to_string()));
        }

        let status = Self::shell(command)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| ExecutorError::Launch(e.to_string()))?;

        // A killed child (operator interrupt) reports no code; treat it as
        // an ordinary non-zero exit.
        Ok(status.code().unwrap_or(130) as u32)
    }

    async fn close(&mut self) -> Result<(), ExecutorError> {
        Ok(())
    }
}
