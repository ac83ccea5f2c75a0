use tracing_subscriber::EnvFilter;

/// Install the JSON log subscriber for a runtime binary. Call once from
/// `main` before serving events.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}
