pub mod activation;
pub mod builder;
pub mod launcher;
pub mod layout;
pub mod log;
pub mod runner;
pub mod runtime_resolver;

/// Serializes tests that read or write the process environment.
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
