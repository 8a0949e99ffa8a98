use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

/// pylaunch - start a Python application inside its project virtual environment
#[derive(Parser, Debug)]
#[command(name = "pylaunch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project root (default: $PYLAUNCH_ROOT or the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Virtual environment directory, relative to the root (default: venv)
    #[arg(long, global = true, value_name = "DIR")]
    pub venv: Option<PathBuf>,

    // Options of the implicit `run` when no subcommand is given.
    #[command(flatten)]
    pub run: RunArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Top-level run options only make sense for the implicit `run`.
    pub fn check_run_options(&self) -> Result<(), clap::Error> {
        if self.command.is_some() && self.run.is_set() {
            return Err(Cli::command().error(
                ErrorKind::ArgumentConflict,
                "run options must follow `run` when a subcommand is given",
            ));
        }
        Ok(())
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Activate the venv, run the entry script, deactivate (default)
    Run(RunArgs),

    /// Report whether the venv, interpreter, entry script and tools are in place
    Check {
        /// Interpreter override (path, or name looked up on the activated PATH)
        #[arg(long, value_name = "PYTHON")]
        python: Option<String>,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Create the venv and install requirements.txt into it
    Setup {
        /// Interpreter used to create the venv (default: python3, then python)
        #[arg(long, value_name = "PYTHON")]
        base_python: Option<String>,

        /// Recreate the venv and reinstall even if requirements are unchanged
        #[arg(long)]
        force: bool,
    },

    /// Remove the venv directory
    Clean {
        /// Show what would be removed
        #[arg(long)]
        dry_run: bool,

        /// Skip the confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Script handed to the interpreter (default: main_window.py)
    #[arg(long, value_name = "SCRIPT")]
    pub entry: Option<String>,

    /// Interpreter override (path, or name looked up on the activated PATH)
    #[arg(long, value_name = "PYTHON")]
    pub python: Option<String>,

    /// Do not wait for Enter when the venv is missing
    #[arg(long)]
    pub no_pause: bool,

    /// Always exit 0 once the application has run, whatever its status
    #[arg(long)]
    pub ignore_exit_code: bool,

    /// Arguments forwarded to the entry script (after `--`)
    #[arg(last = true, value_name = "ARGS")]
    pub args: Vec<OsString>,
}

impl RunArgs {
    fn is_set(&self) -> bool {
        self.entry.is_some()
            || self.python.is_some()
            || self.no_pause
            || self.ignore_exit_code
            || !self.args.is_empty()
    }
}
