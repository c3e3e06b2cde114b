//! One complete push run for a resolved configuration
//!
//! Snapshot, batch push, optional report, exit code. The report is a
//! by-product: failing to write it never changes the outcome of the run.

use crate::core::artifact::ArtifactSnapshot;
use crate::core::config::PusherConfig;
use crate::core::error::PushError;
use crate::core::traits::PushCommand;
use crate::orchestration::batch_publisher::BatchPublisher;
use crate::orchestration::run_report::RunReport;
use crate::plugins::NugetPushCommand;
use crate::security::CommandError;

/// Run the configured package manager over the source directory.
///
/// Returns the process exit code chosen by the configured exit policy.
pub fn run(config: &PusherConfig) -> Result<i32, PushError> {
    let command = NugetPushCommand::from_config(config).map_err(|e| match e {
        CommandError::InvalidWorkingDirectory(path) => PushError::SourceDirectoryMissing(path),
        other => PushError::from(other),
    })?;

    run_with(config, command)
}

/// Same as [`run`] with an explicit push command.
pub fn run_with<C: PushCommand>(config: &PusherConfig, command: C) -> Result<i32, PushError> {
    let snapshot = ArtifactSnapshot::take(&config.source_dir, config.pattern.as_ref())?;

    let publisher = BatchPublisher::new(command, &config.quarantine_dir);
    let summary = publisher.run(&snapshot)?;

    if let Some(report_path) = &config.report_path {
        match RunReport::new(config, &summary).save(report_path) {
            Ok(path) => println!("📝 Report written to {}", path.display()),
            Err(e) => {
                tracing::warn!(path = %report_path.display(), error = %e, "report not written");
                eprintln!("⚠️  Failed to write report: {}", e);
            }
        }
    }

    Ok(summary.exit_code(config.exit_policy))
}
