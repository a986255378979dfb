//! CLI-level errors (wraps script, tree and settings errors)

use std::path::PathBuf;

use thiserror::Error;

use crate::config::SettingsError;
use crate::errors::TreeError;
use crate::script::ScriptError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Script(#[from] ScriptError),

    #[error("{0}")]
    Settings(#[from] SettingsError),

    #[error("cannot read {}: {source}", .path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Script(ScriptError::Parse { .. }) => crate::exitcode::DATAERR,
            CliError::Script(ScriptError::Tree { source, .. }) => match source {
                TreeError::NotFound(_) => crate::exitcode::DATAERR,
                TreeError::InvalidOperation(_) => crate::exitcode::USAGE,
                TreeError::AllocationFailure(_) => crate::exitcode::OSERR,
            },
            CliError::Settings(_) => crate::exitcode::CONFIG,
            CliError::Input { .. } => crate::exitcode::NOINPUT,
            CliError::Io(_) => crate::exitcode::IOERR,
        }
    }
}
