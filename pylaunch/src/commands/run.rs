//! `pylaunch run`: the launcher proper.

use anyhow::Result;
use pylaunch_core::config::LauncherConfig;
use pylaunch_core::error::{LaunchError, EXIT_FAILURE};
use pylaunch_env::launcher::{launch, LaunchPlan};
use pylaunch_env::runner::NativeChildRunner;
use std::ffi::OsString;
use std::io::{self, IsTerminal, Write};
use std::path::Path;

pub fn cmd_run(cfg: &LauncherConfig, args: Vec<OsString>) -> Result<i32> {
    let plan = LaunchPlan::from_config(cfg, args);
    match launch(&plan, &NativeChildRunner) {
        Ok(outcome) if cfg.propagate_exit_code => Ok(outcome.exit_code),
        Ok(outcome) => {
            if !outcome.success() {
                tracing::debug!(exit_code = outcome.exit_code, "Ignoring application exit code");
            }
            Ok(0)
        }
        Err(LaunchError::MissingEnvironmentArtifact { artifact, guide }) => {
            let shown = artifact.strip_prefix(&cfg.root).unwrap_or(artifact.as_path());
            report_missing_environment(shown, &guide, cfg.pause_on_missing);
            Ok(EXIT_FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}

fn report_missing_environment(artifact: &Path, guide: &str, pause: bool) {
    eprintln!("Virtual environment not found: {}", artifact.display());
    eprintln!("Please follow the setup guide in {} to create it, then run again.", guide);
    // Pause only for an interactive console.
    if pause && io::stdin().is_terminal() {
        eprint!("Press Enter to exit...");
        let _ = io::stderr().flush();
        let mut answer = String::new();
        let _ = io::stdin().read_line(&mut answer);
    }
}
