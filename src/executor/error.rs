use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum ExecutorError {
    #[error("Failed to launch command: {0}")]
    Launch(String),

    #[error("Generic executor error: {0}")]
    Other(String),
}
