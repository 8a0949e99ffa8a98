//! Venv activation as a scoped resource.
//!
//! `activate` scripts only edit environment variables. [`Activation`] computes
//! those edits without touching anything; [`ActivationGuard`] applies them to
//! the launcher process (so the child inherits them) and reverts every touched
//! variable when dropped, whichever way the launch ends.

use pylaunch_core::config::env_keys::activation as keys;
use pylaunch_core::config::{remove_env_var, set_env_var};
use pylaunch_core::error::LaunchError;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::layout::VenvLayout;

/// Variable edits performed by activating a venv. `None` means "unset".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    venv: PathBuf,
    changes: Vec<(&'static str, Option<OsString>)>,
}

impl Activation {
    /// Build from the current process `PATH`.
    pub fn for_layout(layout: &VenvLayout) -> Result<Self, LaunchError> {
        Self::with_path(layout, std::env::var_os(keys::PATH))
    }

    pub fn with_path(layout: &VenvLayout, current_path: Option<OsString>) -> Result<Self, LaunchError> {
        let venv = absolute(layout.root());
        let bin_dir = venv.join(layout.flavor().bin_dir_name());

        let mut entries = vec![bin_dir];
        if let Some(ref path) = current_path {
            entries.extend(std::env::split_paths(path));
        }
        let path = std::env::join_paths(entries).map_err(|e| LaunchError::Activation {
            reason: format!("cannot put {} on PATH: {}", venv.display(), e),
        })?;

        let prompt = venv
            .file_name()
            .map(OsStr::to_os_string)
            .unwrap_or_else(|| OsString::from("venv"));

        Ok(Self {
            changes: vec![
                (keys::VIRTUAL_ENV, Some(venv.clone().into_os_string())),
                (keys::VIRTUAL_ENV_PROMPT, Some(prompt)),
                (keys::PATH, Some(path)),
                (keys::PYTHONHOME, None),
            ],
            venv,
        })
    }

    pub fn venv(&self) -> &Path {
        &self.venv
    }

    pub fn changes(&self) -> &[(&'static str, Option<OsString>)] {
        &self.changes
    }

    /// Value a variable takes once activated; `None` when unset or untouched.
    pub fn value(&self, key: &str) -> Option<&OsStr> {
        self.changes
            .iter()
            .find(|(k, _)| *k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    /// The activated `PATH`, used to resolve bare interpreter names.
    pub fn search_path(&self) -> Option<&OsStr> {
        self.value(keys::PATH)
    }
}

/// Applied activation. Dropping it deactivates.
#[must_use = "dropping the guard immediately deactivates the environment"]
#[derive(Debug)]
pub struct ActivationGuard {
    venv: PathBuf,
    saved: Vec<(&'static str, Option<OsString>)>,
}

impl ActivationGuard {
    pub fn acquire(activation: &Activation) -> Self {
        let mut saved = Vec::with_capacity(activation.changes.len());
        for (key, value) in &activation.changes {
            saved.push((*key, std::env::var_os(key)));
            match value {
                Some(v) => set_env_var(key, v),
                None => remove_env_var(key),
            }
        }
        tracing::debug!(venv = %activation.venv.display(), "Environment activated");
        Self {
            venv: activation.venv.clone(),
            saved,
        }
    }

    /// Deactivate now. Same as dropping, but reads better at call sites.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for ActivationGuard {
    fn drop(&mut self) {
        for (key, previous) in self.saved.drain(..).rev() {
            match previous {
                Some(v) => set_env_var(key, v),
                None => remove_env_var(key),
            }
        }
        tracing::debug!(venv = %self.venv.display(), "Environment deactivated");
    }
}

fn absolute(p: &Path) -> PathBuf {
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(p))
            .unwrap_or_else(|_| p.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::VenvFlavor;
    use crate::ENV_LOCK;

    fn layout(dir: &Path) -> VenvLayout {
        VenvLayout::new(dir.join("venv"), VenvFlavor::native())
    }

    #[test]
    fn test_activation_prepends_bin_dir() {
        let dir = tempfile::tempdir().unwrap();
        let layout = layout(dir.path());
        let old = std::env::join_paths([PathBuf::from("/usr/bin"), PathBuf::from("/bin")]).unwrap();
        let act = Activation::with_path(&layout, Some(old)).unwrap();

        let entries: Vec<PathBuf> = std::env::split_paths(act.search_path().unwrap()).collect();
        assert_eq!(entries[0], layout.bin_dir());
        assert_eq!(&entries[1..], &[PathBuf::from("/usr/bin"), PathBuf::from("/bin")]);
        assert_eq!(act.value("VIRTUAL_ENV"), Some(layout.root().as_os_str()));
        assert_eq!(act.value("VIRTUAL_ENV_PROMPT"), Some(OsStr::new("venv")));
        assert_eq!(act.value("PYTHONHOME"), None);
        assert!(act.changes().iter().any(|(k, v)| *k == "PYTHONHOME" && v.is_none()));
    }

    #[test]
    fn test_activation_without_path() {
        let dir = tempfile::tempdir().unwrap();
        let layout = layout(dir.path());
        let act = Activation::with_path(&layout, None).unwrap();
        let entries: Vec<PathBuf> = std::env::split_paths(act.search_path().unwrap()).collect();
        assert_eq!(entries, vec![layout.bin_dir()]);
    }

    #[test]
    fn test_computing_activation_mutates_nothing() {
        let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let before_venv = std::env::var_os("VIRTUAL_ENV");
        let before_path = std::env::var_os("PATH");
        let dir = tempfile::tempdir().unwrap();
        let _ = Activation::for_layout(&layout(dir.path())).unwrap();
        assert_eq!(std::env::var_os("VIRTUAL_ENV"), before_venv);
        assert_eq!(std::env::var_os("PATH"), before_path);
    }

    #[test]
    fn test_guard_applies_and_restores() {
        let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let layout = layout(dir.path());

        let before_path = std::env::var_os("PATH");
        let before_prompt = std::env::var_os("VIRTUAL_ENV_PROMPT");
        let before_venv = std::env::var_os("VIRTUAL_ENV");
        set_env_var("PYTHONHOME", "/opt/python-home");

        let act = Activation::for_layout(&layout).unwrap();
        {
            let _guard = ActivationGuard::acquire(&act);
            assert_eq!(std::env::var_os("VIRTUAL_ENV").as_deref(), act.value("VIRTUAL_ENV"));
            assert_eq!(std::env::var_os("PATH").as_deref(), act.search_path());
            assert!(std::env::var_os("PYTHONHOME").is_none());
        }

        assert_eq!(std::env::var_os("PATH"), before_path);
        assert_eq!(std::env::var_os("VIRTUAL_ENV"), before_venv);
        assert_eq!(std::env::var_os("VIRTUAL_ENV_PROMPT"), before_prompt);
        assert_eq!(
            std::env::var_os("PYTHONHOME").as_deref(),
            Some(OsStr::new("/opt/python-home"))
        );
        remove_env_var("PYTHONHOME");
    }

    #[test]
    fn test_guard_restores_on_panic() {
        let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let act = Activation::for_layout(&layout(dir.path())).unwrap();
        let before_venv = std::env::var_os("VIRTUAL_ENV");

        let result = std::panic::catch_unwind(|| {
            let _guard = ActivationGuard::acquire(&act);
            panic!("child launch blew up");
        });

        assert!(result.is_err());
        assert_eq!(std::env::var_os("VIRTUAL_ENV"), before_venv);
    }
}
