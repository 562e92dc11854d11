//! CLI-specific error types and mappings.
//!
//! Library errors from chatrig-core and chatrig-runtime are folded into
//! [`CliError`], which decides the process exit code.

use chatrig_core::{ControllerError, PathError, RuntimeError, SettingsError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Stack-level failure with no better category.
    #[error("{0}")]
    Stack(String),

    /// Argument parsing error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Process or container execution error.
    #[error("Process error: {0}")]
    Process(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Stack(_) => 1,
            Self::Arguments(_) => 2, // EX_USAGE
            Self::Io(_) => 74,       // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
            Self::Process(_) => 71,  // EX_OSERR
        }
    }
}

impl From<ControllerError> for CliError {
    fn from(err: ControllerError) -> Self {
        match err {
            ControllerError::Config(_) | ControllerError::State(_) => Self::Io(err.to_string()),
            ControllerError::StackStart { .. }
            | ControllerError::StackStop { .. }
            | ControllerError::Gateway { .. } => Self::Process(err.to_string()),
        }
    }
}

impl From<RuntimeError> for CliError {
    fn from(err: RuntimeError) -> Self {
        match err {
            RuntimeError::ComposeFileMissing(_) => Self::Config(err.to_string()),
            _ => Self::Process(err.to_string()),
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<PathError> for CliError {
    fn from(err: PathError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Exit code for a handler failure, defaulting to 1 for untyped errors.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<CliError>().map_or(1, CliError::exit_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_errors_are_configuration_failures() {
        let err = CliError::from(SettingsError::EmptyGatewayCommand);
        assert_eq!(err.exit_code(), 78);
    }

    #[test]
    fn stack_start_failure_keeps_the_compose_file_in_the_message() {
        let err = CliError::from(ControllerError::StackStart {
            file: "/srv/stack/docker-compose.yml".to_string(),
            source: RuntimeError::Exited {
                command: "docker compose up -d".to_string(),
                status: "exit status: 1".to_string(),
                stderr: "no such service".to_string(),
            },
        });

        assert_eq!(err.exit_code(), 71);
        assert!(err.to_string().contains("/srv/stack/docker-compose.yml"));
    }

    #[test]
    fn missing_compose_file_is_a_configuration_failure() {
        let err = CliError::from(RuntimeError::ComposeFileMissing("/nope.yml".to_string()));
        assert_eq!(err.exit_code(), 78);
    }

    #[test]
    fn untyped_errors_exit_with_one() {
        assert_eq!(exit_code_for(&anyhow::anyhow!("boom")), 1);
        assert_eq!(exit_code_for(&anyhow::Error::new(CliError::Io("disk".into()))), 74);
    }
}
