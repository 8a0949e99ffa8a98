//! Subcommand implementations. Each returns the process exit code.

pub mod check;
pub mod clean;
pub mod run;
pub mod setup;
