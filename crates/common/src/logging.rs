use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber once; `RUST_LOG` wins over the default
/// directive when set. Later calls are no-ops.
pub fn init_logging(default_directive: &str) {
    if tracing::dispatcher::has_been_set() {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    fmt()
        .compact()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
