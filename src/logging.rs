//! Library-level log macros.
//!
//! With the `logging` feature the macros forward to `tracing`; without it
//! they expand to nothing, so the codec and backends stay dependency-free
//! for consumers that do not want tracing.
//!
//! ```rust,ignore
//! use crate::logging::debug;
//!
//! debug!(table = table, rows = rows.len(), "scanned table");
//! ```

/// Per-call detail: decoded tokens, individual lookups.
#[cfg(feature = "logging")]
macro_rules! log_trace {
    ($($arg:tt)*) => { tracing::trace!($($arg)*) }
}

#[cfg(not(feature = "logging"))]
macro_rules! log_trace {
    ($($arg:tt)*) => {};
}

/// Backend call summaries.
#[cfg(feature = "logging")]
macro_rules! log_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) }
}

#[cfg(not(feature = "logging"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

/// Connection lifecycle.
#[cfg(feature = "logging")]
macro_rules! log_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) }
}

#[cfg(not(feature = "logging"))]
macro_rules! log_info {
    ($($arg:tt)*) => {};
}

/// Backend failures that are about to surface as errors.
#[cfg(feature = "logging")]
macro_rules! log_warn {
    ($($arg:tt)*) => { tracing::warn!($($arg)*) }
}

#[cfg(not(feature = "logging"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

/// Backend replies the crate cannot interpret.
#[cfg(feature = "logging")]
macro_rules! log_error {
    ($($arg:tt)*) => { tracing::error!($($arg)*) }
}

#[cfg(not(feature = "logging"))]
macro_rules! log_error {
    ($($arg:tt)*) => {};
}

pub(crate) use log_debug as debug;
pub(crate) use log_error as error;
#[allow(unused_imports)]
pub(crate) use log_info as info;
pub(crate) use log_trace as trace;
#[allow(unused_imports)]
pub(crate) use log_warn as warn;
