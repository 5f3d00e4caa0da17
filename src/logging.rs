//! Logging and tracing setup.
//!
//! The library itself only emits `tracing` events: layout compilation and
//! memory growth at `debug`, per-access reads, writes and dereferences at
//! `trace`. Binaries, benches and tests install a subscriber with one of the
//! functions below; the filter comes from `RUST_LOG`.

use std::sync::Once;
use tracing::info;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

static INIT: Once = Once::new();

/// Output format of the installed subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Install the global subscriber. Only the first call has an effect.
///
/// `default_directive` applies when `RUST_LOG` is unset, e.g. `"memview=debug"`.
pub fn init_with(format: LogFormat, default_directive: &str) {
    INIT.call_once(|| {
        let filter = env_filter(default_directive);
        let registry = tracing_subscriber::registry().with(filter);
        // try_init: a test harness may already own the global subscriber
        let installed = match format {
            LogFormat::Text => registry
                .with(
                    fmt::layer()
                        .with_span_events(FmtSpan::CLOSE)
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .try_init(),
            LogFormat::Json => registry
                .with(
                    fmt::layer()
                        .json()
                        .with_span_events(FmtSpan::CLOSE)
                        .with_target(true)
                        .with_current_span(true),
                )
                .try_init(),
        };
        if installed.is_ok() {
            info!(?format, "memview tracing initialized");
        }
    });
}

/// Human readable output at `info` unless `RUST_LOG` says otherwise.
pub fn init_tracing() {
    init_with(LogFormat::Text, "info");
}

/// JSON lines for log collectors.
pub fn init_tracing_json() {
    init_with(LogFormat::Json, "info");
}

/// Create an `info` span.
#[macro_export]
macro_rules! span_trace {
    ($name:expr) => {
        tracing::info_span!($name)
    };
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}

/// Log an error at `error` level and evaluate to it.
#[macro_export]
macro_rules! log_error {
    ($err:expr) => {{
        let e = $err;
        tracing::error!(error = %e, "Operation failed");
        e
    }};
    ($err:expr, $msg:expr) => {{
        let e = $err;
        tracing::error!(error = %e, message = $msg, "Operation failed");
        e
    }};
}
