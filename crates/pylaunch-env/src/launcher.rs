//! The launch sequence.
//!
//! ```text
//! CHECK_ARTIFACT ─ missing ─▶ Err(MissingEnvironmentArtifact)
//!        │ present
//!        ▼
//!    ACTIVATE ─▶ RUN_CHILD ─▶ DEACTIVATE ─▶ Ok(LaunchOutcome)
//! ```
//!
//! Everything that can fail before the child starts (artifact, interpreter,
//! PATH construction) is checked before the environment is touched.

use pylaunch_core::config::LauncherConfig;
use pylaunch_core::error::LaunchError;
use pylaunch_core::observability::{audit, AuditEvent};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::activation::{Activation, ActivationGuard};
use crate::info_log;
use crate::layout::VenvLayout;
use crate::runner::{ChildCommand, ChildRunner, LaunchOutcome};
use crate::runtime_resolver::resolve_interpreter;

/// Inputs of a single launch.
#[derive(Debug, Clone)]
pub struct LaunchPlan {
    pub layout: VenvLayout,
    pub setup_guide: String,
    pub python: Option<String>,
    /// Entry script as passed to the interpreter (relative to `cwd` unless absolute).
    pub entry: String,
    pub args: Vec<OsString>,
    pub cwd: PathBuf,
}

impl LaunchPlan {
    pub fn from_config(cfg: &LauncherConfig, args: Vec<OsString>) -> Self {
        Self {
            layout: VenvLayout::detect(cfg.venv_path()),
            setup_guide: cfg.setup_guide.clone(),
            python: cfg.python.clone(),
            entry: cfg.entry.clone(),
            args,
            cwd: cfg.root.clone(),
        }
    }
}

pub fn launch(plan: &LaunchPlan, runner: &dyn ChildRunner) -> Result<LaunchOutcome, LaunchError> {
    if let Err(e) = plan.layout.require_activation_artifact(&plan.setup_guide) {
        tracing::warn!(artifact = %plan.layout.activation_artifact().display(), "Activation artifact missing");
        audit(AuditEvent::LaunchBlocked {
            artifact: plan.layout.activation_artifact().display().to_string(),
            guide: plan.setup_guide.clone(),
        });
        return Err(e);
    }

    let activation = Activation::for_layout(&plan.layout)?;
    let interpreter = resolve_interpreter(
        &plan.layout,
        plan.python.as_deref(),
        activation.search_path(),
        &plan.cwd,
    )?;

    let mut args = Vec::with_capacity(plan.args.len() + 1);
    args.push(OsString::from(&plan.entry));
    args.extend(plan.args.iter().cloned());
    let child = ChildCommand {
        program: interpreter,
        args,
        cwd: plan.cwd.clone(),
    };

    let guard = ActivationGuard::acquire(&activation);
    info_log!(
        "Activated {} and starting {} {}",
        activation.venv().display(),
        child.program.display(),
        child.display_args().join(" ")
    );
    audit(AuditEvent::LaunchStarted {
        program: child.program.display().to_string(),
        args: child.display_args(),
        cwd: child.cwd.display().to_string(),
        venv: activation.venv().display().to_string(),
    });

    tracing::debug!(runner = runner.name(), "Running child");
    let result = runner.run(&child);
    guard.release();

    let outcome = result?;
    info_log!(
        "{} exited with code {} after {:.1}s; environment deactivated",
        plan.entry,
        outcome.exit_code,
        outcome.duration.as_secs_f64()
    );
    audit(AuditEvent::LaunchCompleted {
        exit_code: outcome.exit_code,
        duration_ms: outcome.duration.as_millis() as u64,
        success: outcome.success(),
    });
    Ok(outcome)
}
