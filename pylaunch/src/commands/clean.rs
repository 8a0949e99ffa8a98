//! `pylaunch clean`: remove the project venv.

use anyhow::{Context, Result};
use pylaunch_core::config::LauncherConfig;
use pylaunch_core::error::LaunchError;
use pylaunch_env::layout::VenvLayout;
use std::fs;
use std::path::Path;

pub fn cmd_clean(cfg: &LauncherConfig, dry_run: bool, force: bool) -> Result<i32> {
    let venv = cfg.venv_path();

    if !venv.exists() {
        eprintln!("No virtual environment at {}", venv.display());
        return Ok(0);
    }
    if !VenvLayout::detect(&venv).looks_like_venv() {
        return Err(LaunchError::NotAVenv { path: venv }.into());
    }

    let size = dir_size(&venv);
    eprintln!("🗂  Virtual environment: {} ({})", venv.display(), format_size(size));

    if dry_run {
        eprintln!("(Dry run — nothing removed. Drop --dry-run to delete.)");
        return Ok(0);
    }

    if !force {
        eprint!("Remove it? [y/N] ");
        let mut answer = String::new();
        std::io::stdin().read_line(&mut answer)?;
        if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            eprintln!("Cancelled.");
            return Ok(0);
        }
    }

    fs::remove_dir_all(&venv).with_context(|| format!("Remove {}", venv.display()))?;
    eprintln!("✓ Removed {}, freed {}", venv.display(), format_size(size));
    Ok(0)
}

fn dir_size(path: &Path) -> u64 {
    let mut total: u64 = 0;
    if let Ok(entries) = fs::read_dir(path) {
        for entry in entries.flatten() {
            let p = entry.path();
            match entry.file_type() {
                Ok(t) if t.is_dir() => total += dir_size(&p),
                Ok(t) if t.is_symlink() => {}
                _ => {
                    if let Ok(meta) = p.metadata() {
                        total += meta.len();
                    }
                }
            }
        }
    }
    total
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_dir_size_counts_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("lib/site-packages")).unwrap();
        fs::write(dir.path().join("pyvenv.cfg"), vec![0u8; 10]).unwrap();
        fs::write(dir.path().join("lib/site-packages/a.py"), vec![0u8; 30]).unwrap();
        assert_eq!(dir_size(dir.path()), 40);
    }
}
