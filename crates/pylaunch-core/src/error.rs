//! Launcher error taxonomy.

use std::path::PathBuf;
use thiserror::Error;

/// Exit code used when the launcher itself fails (as opposed to the child).
pub const EXIT_FAILURE: i32 = 1;

#[derive(Debug, Error)]
pub enum LaunchError {
    /// The activation artifact is absent: the environment was never provisioned.
    #[error("Virtual environment not found: {}", artifact.display())]
    MissingEnvironmentArtifact { artifact: PathBuf, guide: String },

    #[error("Cannot activate environment: {reason}")]
    Activation { reason: String },

    #[error("Python interpreter not found: {}", interpreter.display())]
    InterpreterNotFound { interpreter: PathBuf },

    #[error("Failed to start '{program}'")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No base interpreter found on PATH (tried: {tried})")]
    BaseInterpreterNotFound { tried: String },

    #[error("{step} failed: {stderr}")]
    Provision { step: String, stderr: String },

    #[error("Refusing to remove {}: not a virtual environment", path.display())]
    NotAVenv { path: PathBuf },
}
