pub mod core;
pub mod orchestration;
pub mod plugins;
pub mod security;
pub mod telemetry;

pub use crate::core::*;
pub use orchestration::{BatchPublisher, Disposition, RunReport, RunSummary, run, run_with};
pub use plugins::NugetPushCommand;
pub use security::{CommandError, SafeCommandExecutor, SecureTokenManager};
