//! Logging init for binaries and tests embedding this client.

use tracing_subscriber::EnvFilter;

/// Initialize structured logging to stderr. Honors `RUST_LOG`; defaults to
/// info globally with debug for this crate. Call at most once per process.
pub fn init_logging_stderr() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,xfs_client=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}
