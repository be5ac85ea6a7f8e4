use thiserror::Error;

use crate::command::{CatalogError, DispatchError, OptionsError};
use crate::toolkit::ToolError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Catalog(#[from] CatalogError),

    #[error("{0}")]
    Options(#[from] OptionsError),

    #[error("{0}")]
    Dispatch(#[from] DispatchError),

    #[error("{0}")]
    Tool(#[from] ToolError),
}

impl CliError {
    /// Validation and internal failures exit 1; a failed external command
    /// exits with the child's own code.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Dispatch(DispatchError::ExternalCommandFailed { exit_code, .. }) => {
                *exit_code as i32
            }
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_failures_relay_the_child_exit_code() {
        let err = CliError::from(DispatchError::ExternalCommandFailed {
            command: "aws eks list-clusters".to_string(),
            exit_code: 254,
            stderr: String::new(),
        });
        assert_eq!(err.exit_code(), 254);
    }

    #[test]
    fn test_validation_failures_exit_one() {
        let err = CliError::from(OptionsError::UnknownOption {
            token: "--frobnicate".to_string(),
        });
        assert_eq!(err.exit_code(), 1);

        let err = CliError::from(DispatchError::MissingRequiredParameter("instance-id"));
        assert_eq!(err.exit_code(), 1);
    }
}
