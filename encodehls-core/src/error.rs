// ============================================================================
// encodehls-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Core Error Types
//
// Errors fall into four classes. Configuration errors abort a run before any
// job starts. A missing input fails only that input. Invocation errors are
// contained by the profile job runner and become failed job outcomes. Playlist
// write errors fail the input whose master playlist could not be written.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Custom error types for encodehls-core
#[derive(Error, Debug)]
pub enum CoreError {
    // ---- Configuration ----
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("No encoding profiles configured")]
    NoProfiles,

    #[error("Duplicate encoding profile name '{0}': two profiles would share one output directory")]
    DuplicateProfile(String),

    #[error("Invalid encoding profile '{name}': {reason}")]
    InvalidProfile { name: String, reason: String },

    #[error("Failed to parse settings file {}: {source}", path.display())]
    SettingsParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // ---- Inputs ----
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Path error: {0}")]
    PathError(String),

    // ---- External encoder invocation ----
    #[error("Required dependency '{0}' not found")]
    DependencyNotFound(String),

    #[error("Failed to start {0}: {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("Failed waiting for {0}: {1}")]
    CommandWait(String, #[source] io::Error),

    #[error("{command} failed ({status}): {stderr}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Encoding cancelled")]
    Cancelled,

    // ---- Playlist assembly ----
    #[error("Failed to write master playlist {}: {source}", path.display())]
    PlaylistWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for encodehls-core operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Whether this error belongs to the configuration class and should abort
    /// a run before any job starts.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            CoreError::Config(_)
                | CoreError::NoProfiles
                | CoreError::DuplicateProfile(_)
                | CoreError::InvalidProfile { .. }
                | CoreError::SettingsParse { .. }
        )
    }
}

/// Builds a `CommandStart` error for a process that could not be spawned.
pub fn command_start_error(command: impl Into<String>, source: io::Error) -> CoreError {
    CoreError::CommandStart(command.into(), source)
}

/// Builds a `CommandWait` error for a process whose exit could not be collected.
pub fn command_wait_error(command: impl Into<String>, source: io::Error) -> CoreError {
    CoreError::CommandWait(command.into(), source)
}

/// Builds a `CommandFailed` error from an exit status and captured stderr.
pub fn command_failed_error(
    command: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        command: command.into(),
        status,
        stderr: stderr.into(),
    }
}
