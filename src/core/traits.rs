//! Core traits and types for feed pushing
//!
//! This module defines the seam between the batch routine and the external
//! package-manager command that uploads one artifact.

use crate::core::artifact::Artifact;
use crate::security::CommandError;
use serde::{Deserialize, Serialize};

// ============================================================================
// Push Outcome
// ============================================================================

/// Result of one push attempt, derived from the child's exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "status")]
pub enum PushOutcome {
    /// Exit status 0
    Published,
    /// Any other exit status. `exit_code` is `None` when the child was
    /// terminated by a signal.
    Rejected { exit_code: Option<i32> },
}

impl PushOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self, Self::Published)
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Published => Some(0),
            Self::Rejected { exit_code } => *exit_code,
        }
    }
}

// ============================================================================
// Push Command Trait
// ============================================================================

/// Uploads a single artifact to the feed.
///
/// A rejected upload is a normal `Ok(PushOutcome::Rejected { .. })`.
/// `Err` is reserved for the case where the command could not be run at all.
pub trait PushCommand {
    /// Human-readable name used in progress output (e.g., "dotnet nuget push")
    fn name(&self) -> &str;

    /// Push `artifact` and report how the command exited
    fn push(&self, artifact: &Artifact) -> Result<PushOutcome, CommandError>;
}
