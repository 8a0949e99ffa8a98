//! Quiet-mode aware logging. With PYLAUNCH_QUIET=1 the launcher's [INFO] chatter is dropped.
//! Uses `tracing::info!` so output is captured by the tracing subscriber.

#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {{
        if !$crate::log::is_quiet() {
            tracing::info!($($arg)*);
        }
    }};
}

pub fn is_quiet() -> bool {
    pylaunch_core::config::ObservabilityConfig::from_env().quiet
}
