//! Batch Publisher - pushes every artifact of a snapshot and triages it
//!
//! Features:
//! - Strictly sequential: one artifact is pushed and triaged before the next
//! - Published artifacts are deleted, rejected ones are quarantined
//! - Filesystem errors are reported per artifact and never stop the run
//! - Summary block with success and failure counts

use crate::core::artifact::{Artifact, ArtifactSnapshot};
use crate::core::config::ExitPolicy;
use crate::core::error::PushError;
use crate::core::traits::{PushCommand, PushOutcome};
use crate::orchestration::triage;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

const SEPARATOR_WIDTH: usize = 60;

/// Where an artifact ended up after the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum Disposition {
    /// Pushed and deleted from the source directory
    Published,
    /// Rejected by the feed and moved to quarantine
    Quarantined { exit_code: Option<i32> },
    /// Filesystem error during triage; still in the source directory
    LeftInPlace {
        push: PushOutcome,
        error: String,
    },
}

/// Per-artifact line of the run
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactRecord {
    pub name: String,
    #[serde(flatten)]
    pub disposition: Disposition,
}

/// Counters and records for one run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Artifacts in the snapshot
    pub total: usize,

    /// Published and deleted
    pub succeeded: usize,

    /// Rejected and quarantined
    pub failed: usize,

    /// One record per processed artifact, in processing order
    pub records: Vec<ArtifactRecord>,
}

impl RunSummary {
    fn new(total: usize) -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            finished_at: now,
            total,
            succeeded: 0,
            failed: 0,
            records: Vec::with_capacity(total),
        }
    }

    /// Names of artifacts left in the source directory after a filesystem error
    pub fn left_in_place(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter(|r| matches!(r.disposition, Disposition::LeftInPlace { .. }))
            .map(|r| r.name.as_str())
            .collect()
    }

    /// Process exit code under `policy`
    pub fn exit_code(&self, policy: ExitPolicy) -> i32 {
        match policy {
            ExitPolicy::AlwaysSucceed => 0,
            ExitPolicy::FailOnError => {
                if self.failed == 0 && self.left_in_place().is_empty() {
                    0
                } else {
                    1
                }
            }
        }
    }

    /// Fixed-format summary block
    pub fn render(&self) -> String {
        let separator = "=".repeat(SEPARATOR_WIDTH);
        let mut lines = vec![
            separator.clone(),
            String::new(),
            format!("Successfully uploaded: {} packages.", self.succeeded),
            String::new(),
            format!("Failed to upload: {} packages.", self.failed),
            String::new(),
        ];

        let left = self.left_in_place();
        if !left.is_empty() {
            lines.push(format!(
                "Left in place after filesystem errors: {} packages.",
                left.len()
            ));
            for name in left {
                lines.push(format!("   - {}", name));
            }
            lines.push(String::new());
        }

        lines.push(separator);
        lines.join("\n")
    }
}

/// BatchPublisher - pushes a snapshot of artifacts one by one
pub struct BatchPublisher<C: PushCommand> {
    command: C,
    quarantine_dir: PathBuf,
}

impl<C: PushCommand> BatchPublisher<C> {
    /// Create a new BatchPublisher
    ///
    /// # Arguments
    ///
    /// * `command` - Push command used for every artifact
    /// * `quarantine_dir` - Destination for rejected artifacts
    pub fn new<P: Into<PathBuf>>(command: C, quarantine_dir: P) -> Self {
        Self {
            command,
            quarantine_dir: quarantine_dir.into(),
        }
    }

    /// Push every artifact in `snapshot`, then print the summary.
    ///
    /// A rejected push or a filesystem error affects only the artifact at
    /// hand. The run stops early only when the push command cannot be
    /// started at all; the partial summary is printed before the error is
    /// returned and the remaining artifacts stay untouched.
    pub fn run(&self, snapshot: &ArtifactSnapshot) -> Result<RunSummary, PushError> {
        println!(
            "\n📦 Pushing {} packages with {}\n",
            snapshot.len(),
            self.command.name()
        );

        let mut summary = RunSummary::new(snapshot.len());

        for artifact in snapshot.iter() {
            if let Err(e) = self.process(artifact, &mut summary) {
                summary.finished_at = Utc::now();
                println!("\n{}\n", summary.render());
                return Err(e);
            }
        }

        summary.finished_at = Utc::now();
        println!("\n{}\n", summary.render());

        Ok(summary)
    }

    /// Push and triage a single artifact
    fn process(&self, artifact: &Artifact, summary: &mut RunSummary) -> Result<(), PushError> {
        let name = artifact.display_name();
        println!("🚀 Pushing {}...", name);

        let outcome = self
            .command
            .push(artifact)
            .map_err(|source| PushError::CommandError {
                artifact: name.clone(),
                source,
            })?;

        let triaged = match outcome {
            PushOutcome::Published => triage::discard(artifact).map(|()| {
                println!("✅ {}: uploaded, removed from source", name);
                summary.succeeded += 1;
                Disposition::Published
            }),
            PushOutcome::Rejected { exit_code } => {
                triage::quarantine(artifact, &self.quarantine_dir).map(|moved_to| {
                    println!(
                        "❌ {}: push failed ({}), moved to {}",
                        name,
                        describe_exit(exit_code),
                        moved_to.display()
                    );
                    summary.failed += 1;
                    Disposition::Quarantined { exit_code }
                })
            }
        };

        let disposition = triaged.unwrap_or_else(|e| {
            eprintln!("⚠️  {}", e);
            tracing::warn!(code = e.code(), path = %e.path().display(), "artifact left in place");
            Disposition::LeftInPlace {
                push: outcome,
                error: e.to_string(),
            }
        });

        summary.records.push(ArtifactRecord { name, disposition });
        Ok(())
    }
}

fn describe_exit(exit_code: Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}
