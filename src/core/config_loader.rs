//! Configuration loader for feed-pusher
//!
//! Priority (high to low):
//! 1. CLI arguments
//! 2. Environment variables
//! 3. Default values

use super::config::*;
use crate::core::error::PushError;
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const ENV_SOURCE_URL: &str = "FEED_PUSHER_SOURCE_URL";
pub const ENV_HOST: &str = "FEED_PUSHER_HOST";
pub const ENV_API_KEY: &str = "FEED_PUSHER_API_KEY";
pub const ENV_EXECUTABLE: &str = "FEED_PUSHER_DOTNET";

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub source_dir: PathBuf,
    pub quarantine_dir: PathBuf,
    pub feed_url: Option<String>,
    pub api_key: Option<String>,
    pub executable: Option<PathBuf>,
    pub pattern: Option<String>,
    pub fail_on_error: bool,
    pub report_path: Option<PathBuf>,
}

/// Configuration load options
#[derive(Debug, Clone, Default)]
pub struct ConfigLoadOptions {
    /// CLI arguments (highest priority)
    pub cli: CliOverrides,

    /// Environment variables
    pub env: HashMap<String, String>,
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationError {
    /// Setting name (e.g., "feed_url")
    pub field: String,

    pub message: String,
}

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Resolve and validate the configuration for one run
    pub fn load(options: ConfigLoadOptions) -> Result<PusherConfig, PushError> {
        let ConfigLoadOptions { cli, env } = options;
        let mut errors = Vec::new();

        let feed_url = cli
            .feed_url
            .or_else(|| Self::non_empty(&env, ENV_SOURCE_URL))
            .unwrap_or_else(|| {
                let host = Self::non_empty(&env, ENV_HOST)
                    .unwrap_or_else(|| DEFAULT_FEED_HOST.to_string());
                feed_url_for_host(&host)
            });

        let api_key = cli
            .api_key
            .or_else(|| env.get(ENV_API_KEY).cloned())
            .unwrap_or_default();

        let executable = cli
            .executable
            .or_else(|| Self::non_empty(&env, ENV_EXECUTABLE).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EXECUTABLE));
        // The child runs inside the source directory, so a relative path with
        // a directory part must be pinned to the caller's working directory.
        let executable = if Self::needs_anchoring(&executable) {
            match std::env::current_dir() {
                Ok(cwd) => Self::anchor_executable(executable, &cwd),
                Err(e) => {
                    errors.push(ConfigValidationError {
                        field: "executable".to_string(),
                        message: format!(
                            "cannot resolve '{}' against the current directory: {}",
                            executable.display(),
                            e
                        ),
                    });
                    executable
                }
            }
        } else {
            executable
        };

        let pattern = match cli.pattern.as_deref() {
            Some(raw) => match Regex::new(raw) {
                Ok(regex) => Some(regex),
                Err(e) => {
                    errors.push(ConfigValidationError {
                        field: "pattern".to_string(),
                        message: format!("invalid regular expression: {}", e),
                    });
                    None
                }
            },
            None => None,
        };

        let config = PusherConfig {
            source_dir: cli.source_dir,
            quarantine_dir: cli.quarantine_dir,
            feed_url,
            api_key: SecretString::new(api_key.into()),
            executable,
            pattern,
            exit_policy: if cli.fail_on_error {
                ExitPolicy::FailOnError
            } else {
                ExitPolicy::AlwaysSucceed
            },
            report_path: cli.report_path,
        };

        errors.extend(Self::validate(&config));

        if errors.is_empty() {
            Ok(config)
        } else {
            Err(PushError::ConfigError(Self::format_errors(&errors)))
        }
    }

    /// Validate a resolved configuration
    pub fn validate(config: &PusherConfig) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if config.api_key.expose_secret().trim().is_empty() {
            errors.push(ConfigValidationError {
                field: "api_key".to_string(),
                message: format!("API key is required (--api-key or {})", ENV_API_KEY),
            });
        }

        if !(config.feed_url.starts_with("http://") || config.feed_url.starts_with("https://")) {
            errors.push(ConfigValidationError {
                field: "feed_url".to_string(),
                message: format!("'{}' is not an http(s) URL", config.feed_url),
            });
        }

        if config.executable.as_os_str().is_empty() {
            errors.push(ConfigValidationError {
                field: "executable".to_string(),
                message: "executable must not be empty".to_string(),
            });
        }

        let same_dir = match (
            config.source_dir.canonicalize(),
            config.quarantine_dir.canonicalize(),
        ) {
            (Ok(source), Ok(quarantine)) => source == quarantine,
            _ => config.source_dir == config.quarantine_dir,
        };
        if same_dir {
            errors.push(ConfigValidationError {
                field: "quarantine_dir".to_string(),
                message: "quarantine directory must differ from the source directory".to_string(),
            });
        }

        errors
    }

    /// Relative paths with more than one component; bare names are left to
    /// the `PATH` lookup.
    fn needs_anchoring(executable: &Path) -> bool {
        executable.is_relative() && executable.components().count() > 1
    }

    fn anchor_executable(executable: PathBuf, cwd: &Path) -> PathBuf {
        if Self::needs_anchoring(&executable) {
            cwd.join(executable)
        } else {
            executable
        }
    }

    fn non_empty(env: &HashMap<String, String>, key: &str) -> Option<String> {
        env.get(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn format_errors(errors: &[ConfigValidationError]) -> String {
        errors
            .iter()
            .map(|e| format!("[{}] {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn options(temp_dir: &TempDir) -> ConfigLoadOptions {
        let source = temp_dir.path().join("packages");
        let quarantine = temp_dir.path().join("failed");
        std::fs::create_dir_all(&source).unwrap();
        std::fs::create_dir_all(&quarantine).unwrap();

        ConfigLoadOptions {
            cli: CliOverrides {
                source_dir: source,
                quarantine_dir: quarantine,
                ..Default::default()
            },
            env: HashMap::new(),
        }
    }

    #[test]
    fn test_defaults_with_env_api_key() {
        let temp_dir = TempDir::new().unwrap();
        let mut options = options(&temp_dir);
        options
            .env
            .insert(ENV_API_KEY.to_string(), "env-key-123456".to_string());

        let config = ConfigLoader::load(options).unwrap();

        assert_eq!(config.feed_url, "http://localhost:6060/v3/index.json");
        assert_eq!(config.api_key.expose_secret(), "env-key-123456");
        assert_eq!(config.executable, PathBuf::from("dotnet"));
        assert!(config.pattern.is_none());
        assert_eq!(config.exit_policy, ExitPolicy::AlwaysSucceed);
    }

    #[test]
    fn test_host_from_env() {
        let temp_dir = TempDir::new().unwrap();
        let mut options = options(&temp_dir);
        options.env.insert(ENV_API_KEY.to_string(), "k".to_string());
        options
            .env
            .insert(ENV_HOST.to_string(), "feed.internal:5555".to_string());

        let config = ConfigLoader::load(options).unwrap();

        assert_eq!(config.feed_url, "http://feed.internal:5555/v3/index.json");
    }

    #[test]
    fn test_cli_overrides_env() {
        let temp_dir = TempDir::new().unwrap();
        let mut options = options(&temp_dir);
        options.env.insert(ENV_API_KEY.to_string(), "env-key".to_string());
        options.env.insert(
            ENV_SOURCE_URL.to_string(),
            "https://env.example/v3/index.json".to_string(),
        );
        options
            .env
            .insert(ENV_EXECUTABLE.to_string(), "/opt/dotnet/dotnet".to_string());
        options.cli.api_key = Some("cli-key".to_string());
        options.cli.feed_url = Some("https://cli.example/v3/index.json".to_string());
        options.cli.fail_on_error = true;

        let config = ConfigLoader::load(options).unwrap();

        assert_eq!(config.api_key.expose_secret(), "cli-key");
        assert_eq!(config.feed_url, "https://cli.example/v3/index.json");
        assert_eq!(config.executable, PathBuf::from("/opt/dotnet/dotnet"));
        assert_eq!(config.exit_policy, ExitPolicy::FailOnError);
    }

    #[test]
    fn test_missing_api_key() {
        let temp_dir = TempDir::new().unwrap();
        let result = ConfigLoader::load(options(&temp_dir));

        match result {
            Err(PushError::ConfigError(message)) => assert!(message.contains("[api_key]")),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_pattern_and_url_reported_together() {
        let temp_dir = TempDir::new().unwrap();
        let mut options = options(&temp_dir);
        options.cli.api_key = Some("key".to_string());
        options.cli.pattern = Some("([".to_string());
        options.cli.feed_url = Some("ftp://feed".to_string());

        match ConfigLoader::load(options) {
            Err(PushError::ConfigError(message)) => {
                assert!(message.contains("[pattern]"));
                assert!(message.contains("[feed_url]"));
            }
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_quarantine_same_as_source() {
        let temp_dir = TempDir::new().unwrap();
        let mut options = options(&temp_dir);
        options.cli.api_key = Some("key".to_string());
        options.cli.quarantine_dir = options.cli.source_dir.join(".");

        match ConfigLoader::load(options) {
            Err(PushError::ConfigError(message)) => assert!(message.contains("[quarantine_dir]")),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_relative_executable_with_directory_is_anchored() {
        let temp_dir = TempDir::new().unwrap();
        let mut options = options(&temp_dir);
        options.cli.api_key = Some("key".to_string());
        options.cli.executable = Some(PathBuf::from("./tools/dotnet"));

        let config = ConfigLoader::load(options).unwrap();

        assert!(config.executable.is_absolute());
        assert!(config.executable.ends_with("tools/dotnet"));
        assert!(config.executable.starts_with(std::env::current_dir().unwrap()));
    }

    #[test]
    fn test_anchor_executable() {
        let cwd = Path::new("/home/ci/build");

        assert_eq!(
            ConfigLoader::anchor_executable(PathBuf::from("tools/dotnet"), cwd),
            PathBuf::from("/home/ci/build/tools/dotnet")
        );
        assert_eq!(
            ConfigLoader::anchor_executable(PathBuf::from("dotnet"), cwd),
            PathBuf::from("dotnet")
        );
        assert_eq!(
            ConfigLoader::anchor_executable(PathBuf::from("/opt/dotnet/dotnet"), cwd),
            PathBuf::from("/opt/dotnet/dotnet")
        );
    }
}
