//! Provision the virtual environment the launcher expects: `python -m venv`
//! followed by `pip install -r requirements.txt`.
//!
//! The SHA-256 of the installed requirements file is stamped into the venv so
//! repeated runs skip pip when nothing changed.

use anyhow::{Context, Result};
use pylaunch_core::error::LaunchError;
use pylaunch_core::observability::{audit, AuditEvent};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::info_log;
use crate::layout::VenvLayout;

pub const STAMP_FILE: &str = ".pylaunch-requirements.sha256";

const BASE_PYTHON_CANDIDATES: &[&str] = &["python3", "python"];

#[derive(Debug, Clone, Default)]
pub struct ProvisionOptions {
    /// Interpreter used to create the venv; `None` searches PATH.
    pub base_python: Option<String>,
    /// Recreate the venv and reinstall regardless of the stamp.
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionReport {
    pub venv: PathBuf,
    pub created: bool,
    pub installed: bool,
    pub requirements_hash: Option<String>,
}

pub fn ensure_venv(
    venv_root: &Path,
    requirements: &Path,
    cwd: &Path,
    opts: &ProvisionOptions,
) -> Result<ProvisionReport> {
    let mut layout = VenvLayout::detect(venv_root);
    let mut created = false;

    if opts.force || !layout.has_activation_artifact() {
        let base = find_base_python(opts.base_python.as_deref(), cwd)?;
        info_log!("Creating virtual environment at {} with {}", venv_root.display(), base.display());
        let mut cmd = Command::new(&base);
        cmd.arg("-m").arg("venv");
        if opts.force {
            cmd.arg("--clear");
        }
        cmd.arg(venv_root).current_dir(cwd);
        let out = cmd.output().with_context(|| format!("Run {} -m venv", base.display()))?;
        if !out.status.success() {
            return Err(LaunchError::Provision {
                step: "venv".to_string(),
                stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
            }
            .into());
        }
        layout = VenvLayout::detect(venv_root);
        if !layout.has_activation_artifact() {
            anyhow::bail!(
                "venv finished but {} was not created",
                layout.activation_artifact().display()
            );
        }
        created = true;
    }

    let mut report = ProvisionReport {
        venv: venv_root.to_path_buf(),
        created,
        installed: false,
        requirements_hash: None,
    };

    if !requirements.is_file() {
        tracing::debug!(requirements = %requirements.display(), "No requirements file; skipping pip");
        finish(&report);
        return Ok(report);
    }

    let hash = requirements_hash(requirements)?;
    report.requirements_hash = Some(hash.clone());
    // A freshly created venv has no packages, whatever stamp was left behind.
    if !opts.force && !created && read_stamp(venv_root).as_deref() == Some(hash.as_str()) {
        info_log!("Requirements unchanged since last install; skipping pip");
        finish(&report);
        return Ok(report);
    }

    let python = layout.python();
    if !python.is_file() {
        return Err(LaunchError::InterpreterNotFound { interpreter: python }.into());
    }
    info_log!("Installing {} into {}", requirements.display(), venv_root.display());
    let out = Command::new(&python)
        .args(["-m", "pip", "install", "-r"])
        .arg(requirements)
        .current_dir(cwd)
        .stdout(Stdio::inherit())
        .stderr(Stdio::piped())
        .output()
        .context("Run pip install")?;
    if !out.status.success() {
        return Err(LaunchError::Provision {
            step: "pip install".to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        }
        .into());
    }
    write_stamp(venv_root, &hash)?;
    report.installed = true;
    finish(&report);
    Ok(report)
}

fn finish(report: &ProvisionReport) {
    audit(AuditEvent::VenvProvisioned {
        venv: report.venv.display().to_string(),
        created: report.created,
        installed: report.installed,
    });
}

/// `override_name` first, then `python3`, then `python`.
pub fn find_base_python(override_name: Option<&str>, cwd: &Path) -> Result<PathBuf, LaunchError> {
    let candidates: Vec<&str> = match override_name {
        Some(name) => vec![name],
        None => BASE_PYTHON_CANDIDATES.to_vec(),
    };
    for name in &candidates {
        let p = Path::new(name);
        if p.components().count() > 1 || p.is_absolute() {
            let p = cwd.join(p);
            if p.is_file() {
                return Ok(p);
            }
            continue;
        }
        if let Ok(found) = which::which_in(name, std::env::var_os("PATH"), cwd) {
            return Ok(found);
        }
    }
    Err(LaunchError::BaseInterpreterNotFound {
        tried: candidates.join(", "),
    })
}

pub fn requirements_hash(requirements: &Path) -> Result<String> {
    use sha2::{Digest, Sha256};
    let content = std::fs::read(requirements)
        .with_context(|| format!("Read {}", requirements.display()))?;
    let mut hasher = Sha256::new();
    hasher.update(&content);
    Ok(hex::encode(hasher.finalize()))
}

pub fn read_stamp(venv_root: &Path) -> Option<String> {
    std::fs::read_to_string(venv_root.join(STAMP_FILE))
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn write_stamp(venv_root: &Path, hash: &str) -> Result<()> {
    std::fs::write(venv_root.join(STAMP_FILE), format!("{}\n", hash)).context("Write requirements stamp")
}
