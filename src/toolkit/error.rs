use crate::executor::{ExecutorError, OutputError};
use thiserror::Error;

pub type ToolResult<T> = Result<T, ToolError>;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Unsupported host: {0}")]
    UnsupportedHost(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Installation failed: {0}")]
    InstallationError(String),

    #[error("Executor error: {0}")]
    Executor(#[from] ExecutorError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),
}
