//! `pylaunch setup`: provision the venv the launcher needs.

use anyhow::Result;
use pylaunch_core::config::LauncherConfig;
use pylaunch_env::builder::{ensure_venv, ProvisionOptions};

pub fn cmd_setup(cfg: &LauncherConfig, base_python: Option<String>, force: bool) -> Result<i32> {
    let venv = cfg.venv_path();
    let opts = ProvisionOptions { base_python, force };
    let report = ensure_venv(&venv, &cfg.requirements_path(), &cfg.root, &opts)?;

    if report.created {
        eprintln!("✓ Created virtual environment at {}", venv.display());
    } else {
        eprintln!("✓ Virtual environment already present at {}", venv.display());
    }
    match (report.installed, report.requirements_hash.is_some()) {
        (true, _) => eprintln!("✓ Installed {}", cfg.requirements),
        (false, true) => eprintln!("✓ {} unchanged, nothing to install", cfg.requirements),
        (false, false) => eprintln!("⚠ No {} found; no packages installed", cfg.requirements),
    }
    Ok(0)
}
