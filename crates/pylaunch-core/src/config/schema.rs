//! Typed configuration, grouped by concern.

use super::env_keys::{observability as obv_keys, paths, runtime};
use super::loader::{env_bool, env_optional, env_or, EnvSource, ProcessEnv};
use std::path::{Path, PathBuf};

pub const DEFAULT_VENV_DIR: &str = "venv";
pub const DEFAULT_ENTRY: &str = "main_window.py";
pub const DEFAULT_SETUP_GUIDE: &str = "README.md";
pub const DEFAULT_REQUIREMENTS: &str = "requirements.txt";
pub const DEFAULT_REQUIRED_TOOLS: &[&str] = &["ffmpeg"];

/// Everything the launcher needs to know about the project it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherConfig {
    /// Project root; relative paths below resolve against it and the child runs in it.
    pub root: PathBuf,
    /// Virtual environment directory (relative to `root` unless absolute)
    pub venv_dir: PathBuf,
    /// Script handed to the interpreter
    pub entry: String,
    /// Interpreter override; `None` means the venv's own python
    pub python: Option<String>,
    /// Document named in the missing-environment diagnostic
    pub setup_guide: String,
    /// Requirements file installed by `setup`
    pub requirements: String,
    /// External tools the application expects on PATH (reported by `check`)
    pub required_tools: Vec<String>,
    /// Wait for Enter before exiting when the environment is missing
    pub pause_on_missing: bool,
    /// Exit with the child's status instead of always 0
    pub propagate_exit_code: bool,
}

/// Values given on the command line. `None`/`false` leave the env value alone.
#[derive(Debug, Clone, Default)]
pub struct LauncherOverrides {
    pub venv_dir: Option<PathBuf>,
    pub entry: Option<String>,
    pub python: Option<String>,
    pub no_pause: bool,
    pub ignore_exit_code: bool,
}

impl LauncherConfig {
    /// Resolve the root (CLI > `PYLAUNCH_ROOT` > cwd), load `.env` files, then
    /// read the process environment.
    pub fn from_env(root_override: Option<&Path>) -> Self {
        super::loader::load_dotenv();
        let root = root_override
            .map(Path::to_path_buf)
            .or_else(|| env_optional(&ProcessEnv, paths::PYLAUNCH_ROOT, &[]).map(PathBuf::from))
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
        let root = absolute_root(root);
        super::loader::load_dotenv_from_dir(&root);
        Self::from_source(root, &ProcessEnv)
    }

    pub fn from_source(root: PathBuf, src: &impl EnvSource) -> Self {
        let venv_dir = PathBuf::from(env_or(
            src,
            paths::PYLAUNCH_VENV_DIR,
            paths::VENV_DIR_ALIASES,
            || DEFAULT_VENV_DIR.to_string(),
        ));
        let entry = env_or(src, paths::PYLAUNCH_ENTRY, &[], || DEFAULT_ENTRY.to_string());
        let python = env_optional(src, runtime::PYLAUNCH_PYTHON, &[]);
        let setup_guide = env_or(src, paths::PYLAUNCH_SETUP_GUIDE, &[], || {
            DEFAULT_SETUP_GUIDE.to_string()
        });
        let requirements = env_or(src, paths::PYLAUNCH_REQUIREMENTS, &[], || {
            DEFAULT_REQUIREMENTS.to_string()
        });
        let required_tools = match env_optional(src, runtime::PYLAUNCH_REQUIRED_TOOLS, &[]) {
            Some(raw) => parse_tool_list(&raw),
            None => DEFAULT_REQUIRED_TOOLS.iter().map(|s| s.to_string()).collect(),
        };
        Self {
            root,
            venv_dir,
            entry,
            python,
            setup_guide,
            requirements,
            required_tools,
            pause_on_missing: !env_bool(src, runtime::PYLAUNCH_NO_PAUSE, &[], false),
            propagate_exit_code: !env_bool(src, runtime::PYLAUNCH_IGNORE_EXIT_CODE, &[], false),
        }
    }

    pub fn with_overrides(mut self, overrides: &LauncherOverrides) -> Self {
        if let Some(ref venv_dir) = overrides.venv_dir {
            self.venv_dir = venv_dir.clone();
        }
        if let Some(ref entry) = overrides.entry {
            self.entry = entry.clone();
        }
        if let Some(ref python) = overrides.python {
            self.python = Some(python.clone());
        }
        if overrides.no_pause {
            self.pause_on_missing = false;
        }
        if overrides.ignore_exit_code {
            self.propagate_exit_code = false;
        }
        self
    }

    pub fn venv_path(&self) -> PathBuf {
        self.resolve(&self.venv_dir)
    }

    pub fn entry_path(&self) -> PathBuf {
        self.resolve(Path::new(&self.entry))
    }

    pub fn requirements_path(&self) -> PathBuf {
        self.resolve(Path::new(&self.requirements))
    }

    fn resolve(&self, p: &Path) -> PathBuf {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.root.join(p)
        }
    }
}

/// "ffmpeg, ffprobe,," -> ["ffmpeg", "ffprobe"]. "none" disables the check.
/// Anchor a relative root at the launcher's cwd. The child runs inside the
/// root, so derived paths must be absolute.
fn absolute_root(root: PathBuf) -> PathBuf {
    if root.is_absolute() {
        return root;
    }
    std::path::absolute(&root).unwrap_or(root)
}

fn parse_tool_list(raw: &str) -> Vec<String> {
    if raw.trim().eq_ignore_ascii_case("none") {
        return Vec::new();
    }
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// quiet, log_level, log_json, audit_log
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub quiet: bool,
    pub log_level: String,
    pub log_json: bool,
    pub audit_log: Option<String>,
}

impl ObservabilityConfig {
    pub fn from_env() -> &'static Self {
        use std::sync::OnceLock;
        static CACHE: OnceLock<ObservabilityConfig> = OnceLock::new();
        CACHE.get_or_init(|| {
            super::loader::load_dotenv();
            Self::from_source(&ProcessEnv)
        })
    }

    pub fn from_source(src: &impl EnvSource) -> Self {
        Self {
            quiet: env_bool(src, obv_keys::PYLAUNCH_QUIET, &[], false),
            log_level: env_or(src, obv_keys::PYLAUNCH_LOG_LEVEL, &[], || {
                "pylaunch=info".to_string()
            }),
            log_json: env_bool(src, obv_keys::PYLAUNCH_LOG_JSON, &[], false),
            audit_log: env_optional(src, obv_keys::PYLAUNCH_AUDIT_LOG, &[]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn source(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let cfg = LauncherConfig::from_source(PathBuf::from("/proj"), &source(&[]));
        assert_eq!(cfg.venv_dir, PathBuf::from("venv"));
        assert_eq!(cfg.entry, "main_window.py");
        assert_eq!(cfg.python, None);
        assert_eq!(cfg.setup_guide, "README.md");
        assert_eq!(cfg.required_tools, vec!["ffmpeg".to_string()]);
        assert!(cfg.pause_on_missing);
        assert!(cfg.propagate_exit_code);
        assert_eq!(cfg.venv_path(), PathBuf::from("/proj/venv"));
        assert_eq!(cfg.entry_path(), PathBuf::from("/proj/main_window.py"));
    }

    #[test]
    fn test_env_values_and_alias() {
        let src = source(&[
            ("VENV_DIR", ".venv"),
            ("PYLAUNCH_ENTRY", "app/gui.py"),
            ("PYLAUNCH_PYTHON", "pythonw"),
            ("PYLAUNCH_REQUIRED_TOOLS", "ffmpeg, ffprobe,,"),
            ("PYLAUNCH_NO_PAUSE", "1"),
            ("PYLAUNCH_IGNORE_EXIT_CODE", "yes"),
        ]);
        let cfg = LauncherConfig::from_source(PathBuf::from("/proj"), &src);
        assert_eq!(cfg.venv_dir, PathBuf::from(".venv"));
        assert_eq!(cfg.entry, "app/gui.py");
        assert_eq!(cfg.python.as_deref(), Some("pythonw"));
        assert_eq!(cfg.required_tools, vec!["ffmpeg".to_string(), "ffprobe".to_string()]);
        assert!(!cfg.pause_on_missing);
        assert!(!cfg.propagate_exit_code);
    }

    #[test]
    fn test_required_tools_none() {
        let src = source(&[("PYLAUNCH_REQUIRED_TOOLS", "none")]);
        let cfg = LauncherConfig::from_source(PathBuf::from("/proj"), &src);
        assert!(cfg.required_tools.is_empty());
    }

    #[test]
    fn test_cli_overrides_win() {
        let src = source(&[("PYLAUNCH_VENV_DIR", "env-from-var"), ("PYLAUNCH_ENTRY", "a.py")]);
        let cfg = LauncherConfig::from_source(PathBuf::from("/proj"), &src).with_overrides(
            &LauncherOverrides {
                venv_dir: Some(PathBuf::from("/abs/venv")),
                entry: None,
                python: Some("python3.11".to_string()),
                no_pause: true,
                ignore_exit_code: false,
            },
        );
        assert_eq!(cfg.venv_path(), PathBuf::from("/abs/venv"));
        assert_eq!(cfg.entry, "a.py");
        assert_eq!(cfg.python.as_deref(), Some("python3.11"));
        assert!(!cfg.pause_on_missing);
        assert!(cfg.propagate_exit_code);
    }

    #[test]
    fn test_relative_root_is_anchored_at_cwd() {
        let cwd = std::env::current_dir().unwrap();
        let root = absolute_root(PathBuf::from("proj"));
        assert!(root.is_absolute());
        assert_eq!(root, cwd.join("proj"));

        let cfg = LauncherConfig::from_source(root, &source(&[]));
        assert_eq!(cfg.venv_path(), cwd.join("proj").join("venv"));
    }

    #[test]
    fn test_observability_defaults() {
        let cfg = ObservabilityConfig::from_source(&source(&[]));
        assert!(!cfg.quiet);
        assert_eq!(cfg.log_level, "pylaunch=info");
        assert!(!cfg.log_json);
        assert!(cfg.audit_log.is_none());
    }
}
