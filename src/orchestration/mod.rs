//! Orchestration layer for feed pushing
//!
//! This module runs a snapshot of artifacts through the push command and
//! decides where each one ends up.

pub mod batch_publisher;
pub mod run_report;
pub mod runner;
pub mod triage;

// Re-export main types for convenience
pub use batch_publisher::{ArtifactRecord, BatchPublisher, Disposition, RunSummary};
pub use run_report::RunReport;
pub use runner::{run, run_with};
