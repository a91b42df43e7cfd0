use tracing_subscriber::EnvFilter;

/// Variable holding the log filter, e.g. `TWADS_LOG=twads=debug`.
pub const ENV_LOG_FILTER: &str = "TWADS_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Installs a stderr fmt subscriber. Stdout stays reserved for JSON results.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_env(ENV_LOG_FILTER).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    // a subscriber installed earlier (tests, embedding) wins
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
