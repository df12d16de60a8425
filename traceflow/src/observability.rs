//! Tracing setup for embedding hosts.

use tracing_subscriber::EnvFilter;

/// Installs a global `tracing` subscriber reading the `RUST_LOG`
/// environment variable, defaulting to `info`.
///
/// Safe to call more than once; only the first call installs a
/// subscriber.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
