use async_trait::async_trait;

use super::{CommandResult, ExecutorError};

/// A trait for running external commands in a uniform way.
///
/// The dispatcher and the tool manager only ever see this trait, which is
/// what keeps them testable: unit tests substitute a recording mock and
/// assert on the exact command strings submitted.
#[async_trait]
pub trait CommandExecutor {
    /// Run a command and capture its stdout/stderr/exit code.
    async fn execute_command(&mut self, command: &str) -> Result<CommandResult, ExecutorError>;

    /// Run a command with inherited stdio and block until it exits.
    ///
    /// Used for open-ended operations (log tailing, interactive sessions)
    /// where buffering the output would be wrong. Returns the exit code.
    async fn stream_command(&mut self, command: &str) -> Result<u32, ExecutorError>;

    /// Close or clean up the executor.
    async fn close(&mut self) -> Result<(), ExecutorError>;
}
