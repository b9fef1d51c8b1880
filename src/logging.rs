use tracing_subscriber::EnvFilter;

/// Install the process-wide subscriber. Logs go to stderr so stdout stays
/// reserved for plugin output; `RUST_LOG` overrides the level.
pub(crate) fn init(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(false)
        .without_time()
        .try_init();
}
