//! Error handling for feed pushing
//!
//! Two families of errors exist: `PushError` aborts a run, `TriageError`
//! is reported for a single artifact and the run carries on.

use crate::security::CommandError;
use std::path::PathBuf;
use thiserror::Error;

/// Run-level error. Any of these stops the run.
#[derive(Error, Debug)]
pub enum PushError {
    #[error("The directory '{0}' does not exist")]
    SourceDirectoryMissing(PathBuf),

    #[error("Failed to list '{path}': {message}")]
    ListingFailed { path: PathBuf, message: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Could not run the push command for '{artifact}': {source}")]
    CommandError {
        artifact: String,
        #[source]
        source: CommandError,
    },

    #[error("Could not prepare the push command: {0}")]
    SetupFailed(#[from] CommandError),
}

impl PushError {
    /// Get suggested actions for this error
    pub fn suggested_actions(&self) -> Vec<&'static str> {
        match self {
            Self::SourceDirectoryMissing(_) => vec![
                "Check the source directory path",
                "Create the directory or point to the folder holding the packages",
            ],
            Self::ListingFailed { .. } => vec!["Check read permissions on the source directory"],
            Self::ConfigError(_) => vec![
                "Set FEED_PUSHER_API_KEY or pass --api-key",
                "Check --feed-url / FEED_PUSHER_SOURCE_URL",
            ],
            Self::CommandError { .. } => vec![
                "Make sure the .NET SDK is installed and on PATH",
                "Pass the executable explicitly with --dotnet",
            ],
            Self::SetupFailed(_) => vec![
                "Pass a package-manager executable with --dotnet, not a shell",
                "Check permissions on the source directory",
            ],
        }
    }

    /// Get error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::SourceDirectoryMissing(_) => "SOURCE_DIRECTORY_MISSING",
            Self::ListingFailed { .. } => "LISTING_FAILED",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::CommandError { .. } => "COMMAND_ERROR",
            Self::SetupFailed(_) => "SETUP_FAILED",
        }
    }
}

/// Filesystem error while moving or deleting a single artifact.
///
/// The artifact is left in the source directory in every case.
#[derive(Error, Debug)]
pub enum TriageError {
    #[error("Failed to move '{path}' to quarantine: {message}")]
    MoveFailed { path: PathBuf, message: String },

    #[error("Failed to delete '{path}': {message}")]
    DeleteFailed { path: PathBuf, message: String },

    #[error("Quarantine already holds '{path}', refusing to overwrite")]
    QuarantineOccupied { path: PathBuf },
}

impl TriageError {
    /// Path the error refers to
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::MoveFailed { path, .. }
            | Self::DeleteFailed { path, .. }
            | Self::QuarantineOccupied { path } => path,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::MoveFailed { .. } => "MOVE_FAILED",
            Self::DeleteFailed { .. } => "DELETE_FAILED",
            Self::QuarantineOccupied { .. } => "QUARANTINE_OCCUPIED",
        }
    }
}
