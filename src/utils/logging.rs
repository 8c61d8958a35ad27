//! Conditional logging macros gated on a module-level `ENABLE_LOGS` flag.
//!
//! Event-loop modules produce a lot of per-event chatter; each one declares
//! `const ENABLE_LOGS: bool = ...;` and uses these macros so the chatter can
//! be switched off per module without touching call sites.

/// Info-level logging, active when the calling module's `ENABLE_LOGS` is true.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

/// Warn-level logging, active when the calling module's `ENABLE_LOGS` is true.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

/// Error-level logging, active when the calling module's `ENABLE_LOGS` is true.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}
