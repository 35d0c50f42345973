use tracing_subscriber::EnvFilter;

/// Installs a stderr fmt subscriber. `FPL_LOG` wins over `RUST_LOG`;
/// the default level is `info`. Safe to call more than once.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("FPL_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
