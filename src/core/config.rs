//! Configuration structures for feed-pusher
//!
//! Settings are resolved once at start (see `config_loader`) and passed
//! explicitly into the run. Nothing here is process-global.

use regex::Regex;
use secrecy::SecretString;
use std::path::PathBuf;

/// Host used to build the default feed URL
pub const DEFAULT_FEED_HOST: &str = "localhost:6060";

/// Package-manager executable used when none is configured
pub const DEFAULT_EXECUTABLE: &str = "dotnet";

/// What the process exit code reflects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExitPolicy {
    /// Exit 0 once the run completes, however many uploads failed
    #[default]
    AlwaysSucceed,
    /// Exit 1 when any artifact failed to upload or was left in place
    FailOnError,
}

/// Fully resolved configuration for one run
#[derive(Debug)]
pub struct PusherConfig {
    /// Directory holding the artifacts to push
    pub source_dir: PathBuf,

    /// Destination for artifacts whose push was rejected
    pub quarantine_dir: PathBuf,

    /// Push source (e.g., "http://localhost:6060/v3/index.json")
    pub feed_url: String,

    /// Feed API key
    pub api_key: SecretString,

    /// Package-manager executable
    pub executable: PathBuf,

    /// Optional file-name filter for the snapshot
    pub pattern: Option<Regex>,

    pub exit_policy: ExitPolicy,

    /// Where to write the JSON run report, if anywhere
    pub report_path: Option<PathBuf>,
}

/// Build the default push source URL for a host
pub fn feed_url_for_host(host: &str) -> String {
    format!("http://{}/v3/index.json", host.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_url_for_host() {
        assert_eq!(
            feed_url_for_host(DEFAULT_FEED_HOST),
            "http://localhost:6060/v3/index.json"
        );
        assert_eq!(
            feed_url_for_host("nuget.internal:8080/"),
            "http://nuget.internal:8080/v3/index.json"
        );
    }

    #[test]
    fn test_default_exit_policy() {
        assert_eq!(ExitPolicy::default(), ExitPolicy::AlwaysSucceed);
    }
}
