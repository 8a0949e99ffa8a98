//! Virtual environment layout: where the activation artifact and interpreter live.
//!
//! `python -m venv` produces `bin/` on POSIX and `Scripts/` on Windows. Both are
//! recognised on every platform so a venv created under WSL or Git Bash still
//! resolves; the native flavour is probed first.

use pylaunch_core::error::LaunchError;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VenvFlavor {
    /// `bin/activate`, `bin/python`
    Posix,
    /// `Scripts\activate.bat`, `Scripts\python.exe`
    Windows,
}

impl VenvFlavor {
    pub fn native() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Posix
        }
    }

    pub fn bin_dir_name(self) -> &'static str {
        match self {
            Self::Posix => "bin",
            Self::Windows => "Scripts",
        }
    }

    pub fn activation_script(self) -> &'static str {
        match self {
            Self::Posix => "activate",
            Self::Windows => "activate.bat",
        }
    }

    pub fn python_executable(self) -> &'static str {
        match self {
            Self::Posix => "python",
            Self::Windows => "python.exe",
        }
    }

    fn probe_order() -> [Self; 2] {
        match Self::native() {
            Self::Posix => [Self::Posix, Self::Windows],
            Self::Windows => [Self::Windows, Self::Posix],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenvLayout {
    root: PathBuf,
    flavor: VenvFlavor,
}

impl VenvLayout {
    pub fn new(root: impl Into<PathBuf>, flavor: VenvFlavor) -> Self {
        Self {
            root: root.into(),
            flavor,
        }
    }

    /// Pick the flavour whose activation artifact exists, else the native one.
    pub fn detect(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let flavor = VenvFlavor::probe_order()
            .into_iter()
            .find(|f| {
                root.join(f.bin_dir_name())
                    .join(f.activation_script())
                    .is_file()
            })
            .unwrap_or_else(VenvFlavor::native);
        Self { root, flavor }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn flavor(&self) -> VenvFlavor {
        self.flavor
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.root.join(self.flavor.bin_dir_name())
    }

    pub fn activation_artifact(&self) -> PathBuf {
        self.bin_dir().join(self.flavor.activation_script())
    }

    pub fn python(&self) -> PathBuf {
        self.bin_dir().join(self.flavor.python_executable())
    }

    pub fn has_activation_artifact(&self) -> bool {
        self.activation_artifact().is_file()
    }

    /// The launch precondition. Reads the filesystem only.
    pub fn require_activation_artifact(&self, guide: &str) -> Result<(), LaunchError> {
        if self.has_activation_artifact() {
            Ok(())
        } else {
            Err(LaunchError::MissingEnvironmentArtifact {
                artifact: self.activation_artifact(),
                guide: guide.to_string(),
            })
        }
    }

    /// `pyvenv.cfg` is written by every `venv`/`virtualenv` version.
    pub fn looks_like_venv(&self) -> bool {
        self.has_activation_artifact() || self.root.join("pyvenv.cfg").is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn make_artifact(root: &Path, flavor: VenvFlavor) {
        let bin = root.join(flavor.bin_dir_name());
        fs::create_dir_all(&bin).unwrap();
        fs::write(bin.join(flavor.activation_script()), "").unwrap();
    }

    #[test]
    fn test_missing_artifact_is_reported_with_guide() {
        let dir = tempfile::tempdir().unwrap();
        let layout = VenvLayout::detect(dir.path().join("venv"));
        match layout.require_activation_artifact("SETUP.md") {
            Err(LaunchError::MissingEnvironmentArtifact { artifact, guide }) => {
                assert_eq!(artifact, layout.activation_artifact());
                assert_eq!(guide, "SETUP.md");
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert!(!dir.path().join("venv").exists(), "check must not create anything");
    }

    #[test]
    fn test_detect_prefers_existing_flavor() {
        let dir = tempfile::tempdir().unwrap();
        let other = match VenvFlavor::native() {
            VenvFlavor::Posix => VenvFlavor::Windows,
            VenvFlavor::Windows => VenvFlavor::Posix,
        };
        make_artifact(dir.path(), other);
        let layout = VenvLayout::detect(dir.path());
        assert_eq!(layout.flavor(), other);
        assert!(layout.require_activation_artifact("README.md").is_ok());
    }

    #[test]
    fn test_detect_native_when_both_exist() {
        let dir = tempfile::tempdir().unwrap();
        make_artifact(dir.path(), VenvFlavor::Posix);
        make_artifact(dir.path(), VenvFlavor::Windows);
        assert_eq!(VenvLayout::detect(dir.path()).flavor(), VenvFlavor::native());
    }

    #[cfg(unix)]
    #[test]
    fn test_posix_paths() {
        let layout = VenvLayout::new("/p/venv", VenvFlavor::Posix);
        assert_eq!(layout.activation_artifact(), PathBuf::from("/p/venv/bin/activate"));
        assert_eq!(layout.python(), PathBuf::from("/p/venv/bin/python"));
    }

    #[test]
    fn test_directory_named_activate_is_not_an_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let flavor = VenvFlavor::native();
        fs::create_dir_all(dir.path().join(flavor.bin_dir_name()).join(flavor.activation_script()))
            .unwrap();
        assert!(!VenvLayout::detect(dir.path()).has_activation_artifact());
    }

    #[test]
    fn test_looks_like_venv_via_pyvenv_cfg() {
        let dir = tempfile::tempdir().unwrap();
        let layout = VenvLayout::detect(dir.path());
        assert!(!layout.looks_like_venv());
        fs::write(dir.path().join("pyvenv.cfg"), "home = /usr/bin\n").unwrap();
        assert!(layout.looks_like_venv());
    }
}
