//! ChildRunner trait: the seam between the launch sequence and process spawning.
//!
//! The native runner inherits stdio and blocks until the child exits. No
//! timeout, no retry: the child is the real application and runs as long as
//! the user keeps it open.

use pylaunch_core::error::LaunchError;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

/// What to run. The environment is inherited from the (activated) launcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildCommand {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub cwd: PathBuf,
}

impl ChildCommand {
    /// `program` rendered with its arguments, for logs and audit.
    pub fn display_args(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchOutcome {
    pub exit_code: i32,
    pub duration: Duration,
}

impl LaunchOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

pub trait ChildRunner {
    /// Runner name for logging.
    fn name(&self) -> &str;

    /// Run the child to completion.
    fn run(&self, cmd: &ChildCommand) -> Result<LaunchOutcome, LaunchError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NativeChildRunner;

impl ChildRunner for NativeChildRunner {
    fn name(&self) -> &str {
        "native"
    }

    fn run(&self, cmd: &ChildCommand) -> Result<LaunchOutcome, LaunchError> {
        let start = Instant::now();
        let status = Command::new(&cmd.program)
            .args(&cmd.args)
            .current_dir(&cmd.cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| LaunchError::Spawn {
                program: cmd.program.display().to_string(),
                source,
            })?;
        Ok(LaunchOutcome {
            exit_code: exit_code_of(status),
            duration: start.elapsed(),
        })
    }
}

/// Map a child status to a launcher exit code. Signal deaths become `128 + signal`
/// like a POSIX shell reports them.
pub fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
