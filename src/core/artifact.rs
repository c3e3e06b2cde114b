//! Artifact snapshot of the source directory
//!
//! The directory is listed exactly once, before any artifact is processed.
//! Files dropped into the source directory after that point wait for the
//! next run.

use crate::core::error::PushError;
use regex::Regex;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A packaged file waiting in the source directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// File name inside the source directory
    pub file_name: OsString,
    /// Full path at snapshot time
    pub path: PathBuf,
}

impl Artifact {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let file_name = path.file_name().map(OsString::from).unwrap_or_default();
        Self { file_name, path }
    }

    /// Lossy display name for console output and reports
    pub fn display_name(&self) -> String {
        self.file_name.to_string_lossy().into_owned()
    }
}

/// Ordered list of artifacts present when the run started
#[derive(Debug, Clone, Default)]
pub struct ArtifactSnapshot {
    artifacts: Vec<Artifact>,
}

impl ArtifactSnapshot {
    /// List the regular files directly inside `source_dir`.
    ///
    /// # Arguments
    ///
    /// * `source_dir` - Directory holding the packages
    /// * `pattern` - Optional filter applied to file names
    ///
    /// # Errors
    ///
    /// `PushError::SourceDirectoryMissing` when `source_dir` is not a directory,
    /// `PushError::ListingFailed` when it cannot be read.
    pub fn take(source_dir: &Path, pattern: Option<&Regex>) -> Result<Self, PushError> {
        if !source_dir.is_dir() {
            return Err(PushError::SourceDirectoryMissing(source_dir.to_path_buf()));
        }

        let mut artifacts = Vec::new();
        let walker = WalkDir::new(source_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|e| PushError::ListingFailed {
                path: source_dir.to_path_buf(),
                message: e.to_string(),
            })?;

            let file_type = entry.file_type();
            let is_file =
                file_type.is_file() || (file_type.is_symlink() && entry.path().is_file());
            if !is_file {
                tracing::debug!(path = %entry.path().display(), "skipping non-file entry");
                continue;
            }

            if let Some(pattern) = pattern
                && !pattern.is_match(&entry.file_name().to_string_lossy())
            {
                tracing::debug!(path = %entry.path().display(), "skipping entry not matching pattern");
                continue;
            }

            artifacts.push(Artifact::new(entry.into_path()));
        }

        tracing::debug!(count = artifacts.len(), dir = %source_dir.display(), "snapshot taken");

        Ok(Self { artifacts })
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.iter()
    }
}

impl From<Vec<Artifact>> for ArtifactSnapshot {
    fn from(artifacts: Vec<Artifact>) -> Self {
        Self { artifacts }
    }
}
