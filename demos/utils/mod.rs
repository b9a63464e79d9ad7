use tracing_subscriber::{EnvFilter, fmt::time::*, layer::*, util::*, *};

/// Log to stderr with local timestamps.
///
/// Defaults to debug for this crate and info for everything else. Override with `RUST_LOG`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http_offline_cache=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_timer(LocalTime::rfc_3339()).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
