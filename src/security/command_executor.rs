//! SafeCommandExecutor: argument-vector command execution
//!
//! # Security Features
//!
//! - **No shell**: Uses `std::process::Command`, arguments are never interpolated
//!   into a shell string, so file names like `a;rm -rf ~.nupkg` reach the child verbatim
//! - **Interpreter denylist**: Shell interpreters cannot be used as the executable
//! - **Working directory validation**: Validates existence before execution
//!
//! # Example
//!
//! ```rust,no_run
//! use feed_pusher::SafeCommandExecutor;
//!
//! let executor = SafeCommandExecutor::new(std::env::temp_dir()).unwrap();
//! let status = executor.status("dotnet", &["--version"]).unwrap();
//! println!("exited with {:?}", status.code());
//! ```

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;

/// Executables that would reintroduce shell interpretation of arguments.
const SHELL_INTERPRETERS: &[&str] = &[
    "sh", "bash", "zsh", "dash", "ksh", "fish", "cmd", "powershell", "pwsh",
];

/// Errors that can occur during command execution
#[derive(Error, Debug)]
pub enum CommandError {
    /// Executable is a shell interpreter
    #[error("Command '{0}' is a shell interpreter and is not allowed")]
    ShellNotAllowed(String),

    /// Working directory does not exist or is not accessible
    #[error("Working directory does not exist: {0}")]
    InvalidWorkingDirectory(PathBuf),

    /// Command could not be started (e.g., binary not found, permission denied)
    #[error("Command execution failed: {0}")]
    ExecutionFailed(String),
}

/// Runs external commands inside a fixed working directory.
///
/// The child inherits stdout and stderr; only the exit status is returned.
#[derive(Debug)]
pub struct SafeCommandExecutor {
    /// Working directory where commands will be executed
    working_dir: PathBuf,
}

impl SafeCommandExecutor {
    /// Create a new SafeCommandExecutor with working directory validation.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::InvalidWorkingDirectory` if the directory does not exist.
    pub fn new<P: AsRef<Path>>(working_dir: P) -> Result<Self, CommandError> {
        let working_dir = working_dir.as_ref().to_path_buf();

        if !working_dir.is_dir() {
            return Err(CommandError::InvalidWorkingDirectory(working_dir));
        }

        Ok(Self { working_dir })
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Run `program` with `args` and wait for it to exit.
    ///
    /// Blocks until the child exits; there is no timeout.
    ///
    /// # Errors
    ///
    /// - `CommandError::ShellNotAllowed` - `program` is a shell interpreter
    /// - `CommandError::ExecutionFailed` - Binary not found or could not be spawned
    pub fn status<P, A>(&self, program: P, args: &[A]) -> Result<ExitStatus, CommandError>
    where
        P: AsRef<OsStr>,
        A: AsRef<OsStr>,
    {
        let program = program.as_ref();
        Self::check_not_shell(program)?;

        Command::new(program)
            .args(args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .status()
            .map_err(|e| {
                CommandError::ExecutionFailed(format!("{}: {}", program.to_string_lossy(), e))
            })
    }

    fn check_not_shell(program: &OsStr) -> Result<(), CommandError> {
        let stem = Path::new(program)
            .file_stem()
            .map(|s| s.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        if SHELL_INTERPRETERS.contains(&stem.as_str()) {
            return Err(CommandError::ShellNotAllowed(
                program.to_string_lossy().into_owned(),
            ));
        }

        Ok(())
    }
}
