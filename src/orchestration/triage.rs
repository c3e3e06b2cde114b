//! Terminal actions for a pushed artifact
//!
//! Published artifacts are deleted, rejected ones are moved to the
//! quarantine directory. Both actions either complete or leave the artifact
//! in the source directory only. A move is a `rename` when both directories
//! share a filesystem; across filesystems the file is staged under a
//! temporary name in the quarantine directory, persisted without clobbering,
//! and only then removed from the source. An occupied quarantine slot is
//! never overwritten.

use crate::core::artifact::Artifact;
use crate::core::error::TriageError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const STAGING_PREFIX: &str = ".feed-pusher-";

/// Move `artifact` into `quarantine_dir`, keeping its file name.
///
/// Returns the new location.
pub fn quarantine(artifact: &Artifact, quarantine_dir: &Path) -> Result<PathBuf, TriageError> {
    let target = quarantine_dir.join(&artifact.file_name);

    if target.exists() {
        return Err(TriageError::QuarantineOccupied { path: target });
    }

    match fs::rename(&artifact.path, &target) {
        Ok(()) => Ok(target),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            tracing::debug!(path = %artifact.path.display(), "rename crosses devices, copying");
            copy_across_devices(artifact, quarantine_dir, &target)?;
            Ok(target)
        }
        Err(e) => Err(TriageError::MoveFailed {
            path: artifact.path.clone(),
            message: e.to_string(),
        }),
    }
}

/// Copy-then-remove move used when `rename` cannot cross filesystems.
///
/// The staged copy is deleted on any failure before it is persisted. If the
/// source cannot be removed afterwards, the persisted copy is removed again.
fn copy_across_devices(
    artifact: &Artifact,
    quarantine_dir: &Path,
    target: &Path,
) -> Result<(), TriageError> {
    let move_failed = |e: io::Error| TriageError::MoveFailed {
        path: artifact.path.clone(),
        message: e.to_string(),
    };

    let mut staged = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempfile_in(quarantine_dir)
        .map_err(move_failed)?;
    let mut source = fs::File::open(&artifact.path).map_err(move_failed)?;
    io::copy(&mut source, staged.as_file_mut()).map_err(move_failed)?;
    staged.as_file().sync_all().map_err(move_failed)?;
    drop(source);

    staged.persist_noclobber(target).map_err(|e| {
        if e.error.kind() == io::ErrorKind::AlreadyExists {
            TriageError::QuarantineOccupied {
                path: target.to_path_buf(),
            }
        } else {
            move_failed(e.error)
        }
    })?;

    if let Err(e) = fs::remove_file(&artifact.path) {
        if let Err(cleanup) = fs::remove_file(target) {
            tracing::warn!(path = %target.display(), error = %cleanup, "could not remove quarantine copy");
        }
        return Err(move_failed(e));
    }

    Ok(())
}

/// Delete `artifact` from the source directory.
pub fn discard(artifact: &Artifact) -> Result<(), TriageError> {
    fs::remove_file(&artifact.path).map_err(|e| TriageError::DeleteFailed {
        path: artifact.path.clone(),
        message: e.to_string(),
    })
}
