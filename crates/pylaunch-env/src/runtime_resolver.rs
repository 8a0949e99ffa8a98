//! RuntimeResolver trait: picks the interpreter the launcher hands the entry script to.
//!
//! The venv's own python is the default. An explicit override may be a path or
//! a bare name such as `pythonw`, which is looked up on the *activated* PATH so
//! the venv's bin dir is searched first.

use pylaunch_core::error::LaunchError;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::layout::VenvLayout;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRuntime {
    /// Path to the interpreter executable
    pub interpreter: PathBuf,
}

pub trait RuntimeResolver {
    /// Human-readable description for diagnostics.
    fn describe(&self) -> String;

    /// `search_path` is a PATH-style list; `cwd` anchors relative paths.
    fn resolve(&self, search_path: Option<&OsStr>, cwd: &Path) -> Option<ResolvedRuntime>;
}

impl RuntimeResolver for VenvLayout {
    fn describe(&self) -> String {
        self.python().display().to_string()
    }

    fn resolve(&self, _search_path: Option<&OsStr>, _cwd: &Path) -> Option<ResolvedRuntime> {
        let python = self.python();
        python.is_file().then_some(ResolvedRuntime {
            interpreter: python,
        })
    }
}

/// User-supplied interpreter, e.g. `pythonw`, `python3.11`, `tools/py/python.exe`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedInterpreter(pub String);

impl NamedInterpreter {
    fn is_path_like(&self) -> bool {
        let p = Path::new(&self.0);
        p.is_absolute() || p.components().count() > 1
    }
}

impl RuntimeResolver for NamedInterpreter {
    fn describe(&self) -> String {
        self.0.clone()
    }

    fn resolve(&self, search_path: Option<&OsStr>, cwd: &Path) -> Option<ResolvedRuntime> {
        if self.is_path_like() {
            let p = cwd.join(&self.0);
            return p.is_file().then_some(ResolvedRuntime { interpreter: p });
        }
        which::which_in(&self.0, search_path, cwd)
            .ok()
            .map(|interpreter| ResolvedRuntime { interpreter })
    }
}

/// Resolve the override if given, else the venv interpreter.
pub fn resolve_interpreter(
    layout: &VenvLayout,
    python_override: Option<&str>,
    search_path: Option<&OsStr>,
    cwd: &Path,
) -> Result<PathBuf, LaunchError> {
    let resolver: Box<dyn RuntimeResolver> = match python_override {
        Some(name) => Box::new(NamedInterpreter(name.to_string())),
        None => Box::new(layout.clone()),
    };
    match resolver.resolve(search_path, cwd) {
        Some(rt) => {
            tracing::debug!(interpreter = %rt.interpreter.display(), "Resolved interpreter");
            Ok(rt.interpreter)
        }
        None => Err(LaunchError::InterpreterNotFound {
            interpreter: PathBuf::from(resolver.describe()),
        }),
    }
}
