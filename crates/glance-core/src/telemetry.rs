//! Tracing bootstrap shared by binaries and integration tests.

/// Initialize the global tracing subscriber.
///
/// Respects `RUST_LOG` when set, otherwise uses `default_level` (e.g. the
/// `general.log_level` config value). Later calls in the same process are
/// no-ops.
pub fn init(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
