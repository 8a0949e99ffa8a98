mod cli;
mod commands;
mod observability;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use pylaunch_core::config::{LauncherConfig, LauncherOverrides};
use pylaunch_core::error::EXIT_FAILURE;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = cli.check_run_options() {
        e.exit();
    }
    let code = match dispatch(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            EXIT_FAILURE
        }
    };
    // Every guard has been dropped by now; exit() skips destructors.
    std::process::exit(code);
}

fn dispatch(cli: Cli) -> Result<i32> {
    let command = cli.command.unwrap_or(Commands::Run(cli.run));

    let mut overrides = LauncherOverrides {
        venv_dir: cli.venv,
        ..Default::default()
    };
    match &command {
        Commands::Run(args) => {
            overrides.entry = args.entry.clone();
            overrides.python = args.python.clone();
            overrides.no_pause = args.no_pause;
            overrides.ignore_exit_code = args.ignore_exit_code;
        }
        Commands::Check { python, .. } => overrides.python = python.clone(),
        Commands::Setup { .. } | Commands::Clean { .. } => {}
    }
    let cfg = LauncherConfig::from_env(cli.root.as_deref()).with_overrides(&overrides);
    observability::init_tracing();
    tracing::debug!(?cfg, "Configuration resolved");

    match command {
        Commands::Run(args) => commands::run::cmd_run(&cfg, args.args),
        Commands::Check { json, .. } => commands::check::cmd_check(&cfg, json),
        Commands::Setup { base_python, force } => commands::setup::cmd_setup(&cfg, base_python, force),
        Commands::Clean { dry_run, force } => commands::clean::cmd_clean(&cfg, dry_run, force),
    }
}
