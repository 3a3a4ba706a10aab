use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber. Verbosity is controlled with
/// `RUST_LOG`; the default level is `info`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}
