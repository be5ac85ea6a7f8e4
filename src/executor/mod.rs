pub mod error;
pub mod local;
#[cfg(test)]
pub mod mock;
pub mod traits;
pub mod types;

pub use error::ExecutorError;
pub use local::LocalCommandExecutor;
pub use traits::CommandExecutor;
pub use types::{CommandOutput, CommandResult, OutputError};
