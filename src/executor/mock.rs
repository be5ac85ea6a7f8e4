use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;

use super::{CommandExecutor, CommandOutput, CommandResult, ExecutorError};

/// Scripted executor for unit tests. Expected command lines are registered
/// up front together with canned results; any other command fails the test
/// loudly instead of reaching a real process. Registering the same command
/// twice queues responses, and the last one sticks for repeat calls.
#[derive(Debug, Default)]
pub struct MockExecutor {
    responses: HashMap<String, VecDeque<Canned>>,
    pub commands: Vec<String>,
    pub streamed: Vec<String>,
}

#[derive(Debug, Clone)]
enum Canned {
    Captured {
        stdout: String,
        stderr: String,
        exit_code: u32,
    },
    Streamed {
        exit_code: u32,
    },
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_success(&mut self, command: &str, stdout: &str) {
        self.respond(command, stdout, "", 0);
    }

    pub fn respond(&mut self, command: &str, stdout: &str, stderr: &str, exit_code: u32) {
        self.push(
            command,
            Canned::Captured {
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
                exit_code,
            },
        );
    }

    pub fn stream_exit(&mut self, command: &str, exit_code: u32) {
        self.push(command, Canned::Streamed { exit_code });
    }

    fn push(&mut self, command: &str, canned: Canned) {
        self.responses
            .entry(command.to_string())
            .or_default()
            .push_back(canned);
    }

    fn next_response(&mut self, command: &str) -> Option<Canned> {
        let queue = self.responses.get_mut(command)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }

    /// Every external call made through this executor, captured or streamed.
    pub fn call_count(&self) -> usize {
        self.commands.len() + self.streamed.len()
    }
}

#[async_trait]
impl CommandExecutor for MockExecutor {
    async fn execute_command(&mut self, command: &str) -> Result<CommandResult, ExecutorError> {
        self.commands.push(command.to_string());
        match self.next_response(command) {
            Some(Canned::Captured {
                stdout,
                stderr,
                exit_code,
            }) => {
                let mut result = CommandResult::new(command);
                result.output = CommandOutput {
                    stdout: stdout.into_bytes(),
                    stderr: stderr.into_bytes(),
                    exit_code,
                    ..CommandOutput::new()
                };
                Ok(result)
            }
            _ => Err(ExecutorError::Other(format!(
                "unexpected command: {command}"
            ))),
        }
    }

    async fn stream_command(&mut self, command: &str) -> Result<u32, ExecutorError> {
        self.streamed.push(command.to_string());
        match self.next_response(command) {
            Some(Canned::Streamed { exit_code }) => Ok(exit_code),
            _ => Err(ExecutorError::Other(format!(
                "unexpected streamed command: {command}"
            ))),
        }
    }

    async fn close(&mut self) -> Result<(), ExecutorError> {
        Ok(())
    }
}
