#![forbid(unsafe_code)]

//! Logging shim.
//!
//! With the `tracing` feature the usual `tracing` macros are re-exported at
//! the crate root. Without it, the same names expand to nothing so call sites
//! never need their own `cfg` attributes:
//!
//! ```ignore
//! use sheetpane_core::{debug, trace};
//!
//! debug!(from = ?old, to = ?new, "state change");
//! ```
//!
//! Span macros return a [`NoopSpan`] when tracing is disabled, which supports
//! the `entered()` / `in_scope()` calls that real spans do.

#[cfg(feature = "tracing")]
pub use tracing::{debug, debug_span, error, info, info_span, trace, trace_span, warn};

/// Stand-in returned by span macros when tracing is compiled out.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSpan;

impl NoopSpan {
    /// Mirrors `tracing::Span::entered`.
    #[inline]
    #[must_use]
    pub fn entered(self) -> Self {
        self
    }

    /// Mirrors `tracing::Span::in_scope`.
    #[inline]
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        f()
    }
}

#[cfg(not(feature = "tracing"))]
mod noop {
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {{}};
    }

    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {{}};
    }

    #[macro_export]
    macro_rules! info {
        ($($arg:tt)*) => {{}};
    }

    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {{}};
    }

    #[macro_export]
    macro_rules! error {
        ($($arg:tt)*) => {{}};
    }

    #[macro_export]
    macro_rules! trace_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }

    #[macro_export]
    macro_rules! debug_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }

    #[macro_export]
    macro_rules! info_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }
}

/// Install a JSON `tracing` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Returns an error if a global subscriber is already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json_subscriber() -> Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json())
        .try_init()
}
