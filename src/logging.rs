//! Logging init: tracing subscriber on stderr with env-filter control.

use tracing_subscriber::EnvFilter;

/// Initialize structured logging to stderr.
///
/// Filter defaults to `info,fragloader=debug` and can be overridden with
/// `RUST_LOG`. Call once from the host application; the library itself only
/// emits `tracing` events and never installs a subscriber on its own.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,fragloader=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}
