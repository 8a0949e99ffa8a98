//! Environment variable key constants.
//!
//! Primary keys are `PYLAUNCH_*`; aliases are read only when the primary is unset.

/// Project layout
pub mod paths {
    pub const PYLAUNCH_ROOT: &str = "PYLAUNCH_ROOT";

    pub const PYLAUNCH_VENV_DIR: &str = "PYLAUNCH_VENV_DIR";
    pub const VENV_DIR_ALIASES: &[&str] = &["VENV_DIR"];

    pub const PYLAUNCH_ENTRY: &str = "PYLAUNCH_ENTRY";
    pub const PYLAUNCH_SETUP_GUIDE: &str = "PYLAUNCH_SETUP_GUIDE";
    pub const PYLAUNCH_REQUIREMENTS: &str = "PYLAUNCH_REQUIREMENTS";
}

/// Interpreter and child process behaviour
pub mod runtime {
    pub const PYLAUNCH_PYTHON: &str = "PYLAUNCH_PYTHON";
    pub const PYLAUNCH_REQUIRED_TOOLS: &str = "PYLAUNCH_REQUIRED_TOOLS";
    pub const PYLAUNCH_NO_PAUSE: &str = "PYLAUNCH_NO_PAUSE";
    pub const PYLAUNCH_IGNORE_EXIT_CODE: &str = "PYLAUNCH_IGNORE_EXIT_CODE";
}

/// Variables written by venv activation
pub mod activation {
    pub const VIRTUAL_ENV: &str = "VIRTUAL_ENV";
    pub const VIRTUAL_ENV_PROMPT: &str = "VIRTUAL_ENV_PROMPT";
    pub const PATH: &str = "PATH";
    pub const PYTHONHOME: &str = "PYTHONHOME";
}

/// Logging and audit
pub mod observability {
    pub const PYLAUNCH_QUIET: &str = "PYLAUNCH_QUIET";
    pub const PYLAUNCH_LOG_LEVEL: &str = "PYLAUNCH_LOG_LEVEL";
    pub const PYLAUNCH_LOG_JSON: &str = "PYLAUNCH_LOG_JSON";
    pub const PYLAUNCH_AUDIT_LOG: &str = "PYLAUNCH_AUDIT_LOG";
}
