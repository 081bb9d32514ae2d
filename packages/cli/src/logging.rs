// ABOUTME: Tracing subscriber setup for the CLI
// ABOUTME: Filter comes from REQFLOW_LOG or RUST_LOG, output goes to stderr

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Safe to call more than once.
pub fn init_logging(verbose: bool) {
    let directive = if verbose {
        "debug".to_string()
    } else {
        reqflow_config::log_filter()
    };

    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| {
        EnvFilter::new(reqflow_config::DEFAULT_LOG_FILTER)
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
