pub mod config;
pub mod core_state;
pub mod llm;
pub mod ollama_service;
pub mod report;
pub mod templates;

use tracing_subscriber::EnvFilter;

/// Initialize tracing with the env filter, falling back to the crate default.
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}
