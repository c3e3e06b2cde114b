//! NuGet Plugin - pushes one artifact with `dotnet nuget push`

use crate::core::artifact::Artifact;
use crate::core::config::PusherConfig;
use crate::core::traits::{PushCommand, PushOutcome};
use crate::security::{CommandError, SafeCommandExecutor, SecureTokenManager};
use secrecy::{ExposeSecret, SecretString};
use std::ffi::OsString;
use std::path::PathBuf;

/// `dotnet nuget push` against a single feed
pub struct NugetPushCommand {
    executor: SafeCommandExecutor,
    executable: PathBuf,
    feed_url: String,
    token_manager: SecureTokenManager,
}

impl NugetPushCommand {
    /// Build the command for the source directory described by `config`.
    ///
    /// # Errors
    ///
    /// `CommandError::InvalidWorkingDirectory` when the source directory is missing.
    pub fn from_config(config: &PusherConfig) -> Result<Self, CommandError> {
        Ok(Self {
            executor: SafeCommandExecutor::new(&config.source_dir)?,
            executable: config.executable.clone(),
            feed_url: config.feed_url.clone(),
            token_manager: SecureTokenManager::new(SecretString::new(
                config.api_key.expose_secret().into(),
            )),
        })
    }

    /// Argument vector for one artifact, relative to the source directory
    pub fn arguments(&self, artifact: &Artifact) -> Vec<OsString> {
        vec![
            "nuget".into(),
            "push".into(),
            "-s".into(),
            self.feed_url.clone().into(),
            "--api-key".into(),
            self.token_manager.expose().into(),
            artifact.file_name.clone(),
        ]
    }

    /// Command line as it can be shown to an operator, with the key masked
    pub fn display_command(&self, artifact: &Artifact) -> String {
        let rendered = std::iter::once(self.executable.as_os_str().to_os_string())
            .chain(self.arguments(artifact))
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ");
        self.token_manager.mask_in_string(&rendered)
    }
}

impl PushCommand for NugetPushCommand {
    fn name(&self) -> &str {
        "dotnet nuget push"
    }

    fn push(&self, artifact: &Artifact) -> Result<PushOutcome, CommandError> {
        tracing::debug!(command = %self.display_command(artifact), "running push");

        let status = self
            .executor
            .status(&self.executable, &self.arguments(artifact))?;

        tracing::debug!(artifact = %artifact.display_name(), ?status, "push finished");

        if status.success() {
            Ok(PushOutcome::Published)
        } else {
            Ok(PushOutcome::Rejected {
                exit_code: status.code(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ExitPolicy;
    use tempfile::TempDir;

    fn config(source_dir: PathBuf, executable: PathBuf) -> PusherConfig {
        PusherConfig {
            quarantine_dir: source_dir.join("quarantine"),
            source_dir,
            feed_url: "http://localhost:6060/v3/index.json".to_string(),
            api_key: SecretString::new("feed-api-key-0042".into()),
            executable,
            pattern: None,
            exit_policy: ExitPolicy::AlwaysSucceed,
            report_path: None,
        }
    }

    #[test]
    fn test_arguments_layout() {
        let temp_dir = TempDir::new().unwrap();
        let command =
            NugetPushCommand::from_config(&config(temp_dir.path().into(), "dotnet".into()))
                .unwrap();
        let artifact = Artifact::new(temp_dir.path().join("Lib.1.0.0.nupkg"));

        let args: Vec<String> = command
            .arguments(&artifact)
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert_eq!(
            args,
            vec![
                "nuget",
                "push",
                "-s",
                "http://localhost:6060/v3/index.json",
                "--api-key",
                "feed-api-key-0042",
                "Lib.1.0.0.nupkg",
            ]
        );
    }

    #[test]
    fn test_display_command_masks_key() {
        let temp_dir = TempDir::new().unwrap();
        let command =
            NugetPushCommand::from_config(&config(temp_dir.path().into(), "dotnet".into()))
                .unwrap();
        let artifact = Artifact::new(temp_dir.path().join("a.nupkg"));

        let shown = command.display_command(&artifact);

        assert!(shown.starts_with("dotnet nuget push -s "));
        assert!(shown.contains("--api-key fee...042"));
        assert!(!shown.contains("feed-api-key-0042"));
    }

    #[test]
    fn test_missing_source_directory() {
        let temp_dir = TempDir::new().unwrap();
        let result =
            NugetPushCommand::from_config(&config(temp_dir.path().join("gone"), "dotnet".into()));
        assert!(matches!(
            result,
            Err(CommandError::InvalidWorkingDirectory(_))
        ));
    }

    #[cfg(unix)]
    mod stub_script {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        /// Writes an executable stub that records its arguments and exits
        /// non-zero for artifact names containing "bad".
        fn write_stub(dir: &std::path::Path) -> PathBuf {
            let path = dir.join("fake-dotnet");
            fs::write(
                &path,
                "#!/bin/sh\n\
                 for last; do :; done\n\
                 printf '%s\\n' \"$@\" > \"../args-$(printf %s \"$last\" | tr -c 'A-Za-z0-9.' '_').txt\"\n\
                 case \"$last\" in *bad*) exit 3 ;; esac\n\
                 exit 0\n",
            )
            .unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[test]
        fn test_exit_status_maps_to_outcome() {
            let temp_dir = TempDir::new().unwrap();
            let source = temp_dir.path().join("packages");
            fs::create_dir(&source).unwrap();
            let stub = write_stub(temp_dir.path());
            let command = NugetPushCommand::from_config(&config(source.clone(), stub)).unwrap();

            let good = Artifact::new(source.join("good.nupkg"));
            let bad = Artifact::new(source.join("bad.nupkg"));

            assert_eq!(command.push(&good).unwrap(), PushOutcome::Published);
            assert_eq!(
                command.push(&bad).unwrap(),
                PushOutcome::Rejected { exit_code: Some(3) }
            );
        }

        #[test]
        fn test_metacharacters_reach_child_verbatim() {
            let temp_dir = TempDir::new().unwrap();
            let source = temp_dir.path().join("packages");
            fs::create_dir(&source).unwrap();
            let stub = write_stub(temp_dir.path());
            let command = NugetPushCommand::from_config(&config(source.clone(), stub)).unwrap();

            let name = "x; touch pwned $(id) `id`.nupkg";
            let artifact = Artifact::new(source.join(name));

            assert_eq!(command.push(&artifact).unwrap(), PushOutcome::Published);
            assert!(!source.join("pwned").exists());

            let recorded = fs::read_dir(temp_dir.path())
                .unwrap()
                .filter_map(Result::ok)
                .find(|e| e.file_name().to_string_lossy().starts_with("args-"))
                .map(|e| fs::read_to_string(e.path()).unwrap())
                .unwrap();
            assert_eq!(recorded.lines().last(), Some(name));
        }
    }
}
