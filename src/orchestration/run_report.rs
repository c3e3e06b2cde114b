//! RunReport - JSON record of one push run
//!
//! Written only when asked for. The API key never appears in the report.

use crate::core::config::PusherConfig;
use crate::orchestration::batch_publisher::{ArtifactRecord, RunSummary};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

const REPORT_VERSION: &str = "1.0";

/// Serialized form of a finished run
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub version: &'static str,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub source_dir: &'a Path,
    pub quarantine_dir: &'a Path,
    pub feed_url: &'a str,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub left_in_place: usize,
    pub artifacts: &'a [ArtifactRecord],
}

impl<'a> RunReport<'a> {
    pub fn new(config: &'a PusherConfig, summary: &'a RunSummary) -> Self {
        Self {
            version: REPORT_VERSION,
            started_at: summary.started_at,
            finished_at: summary.finished_at,
            source_dir: &config.source_dir,
            quarantine_dir: &config.quarantine_dir,
            feed_url: &config.feed_url,
            total: summary.total,
            succeeded: summary.succeeded,
            failed: summary.failed,
            left_in_place: summary.left_in_place().len(),
            artifacts: &summary.records,
        }
    }

    pub fn to_json(&self) -> Result<String, anyhow::Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report to `path`, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<PathBuf, anyhow::Error> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, self.to_json()?)?;
        Ok(path.to_path_buf())
    }
}
