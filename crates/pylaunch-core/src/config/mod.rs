//! pylaunch configuration layer
//!
//! Every environment variable read goes through this module; callers use the
//! typed structs instead of `std::env::var`.
//!
//! - `loader`: `.env` loading, alias fallback chains, boolean parsing
//! - `schema`: `LauncherConfig`, `LauncherOverrides`, `ObservabilityConfig`
//! - `env_keys`: key constants

pub mod env_keys;
pub mod loader;
pub mod schema;

pub use loader::{
    env_bool, env_optional, env_or, load_dotenv, load_dotenv_from_dir, remove_env_var,
    set_env_var, EnvSource, ProcessEnv,
};
pub use schema::{LauncherConfig, LauncherOverrides, ObservabilityConfig};
