use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Radscribe";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default local Ollama endpoint.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Timeout for generation calls. Local models are slow; give them room.
pub const GENERATION_TIMEOUT_SECS: u64 = 300;

/// Timeout for remote template fetches. These are small text files and any
/// failure degrades to the next resolution source, so keep it short.
pub const REMOTE_TEMPLATE_TIMEOUT_SECS: u64 = 10;

/// Default base location for the remote template source.
pub const DEFAULT_TEMPLATE_BASE_URL: &str = "http://localhost:8080/templates";

/// Get the application data directory
/// ~/Radscribe/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join("Radscribe")
}

/// Get the local template store directory
pub fn templates_dir() -> PathBuf {
    app_data_dir().join("templates")
}

/// Ollama base URL, with env override.
pub fn ollama_url() -> String {
    std::env::var("RADSCRIBE_OLLAMA_URL").unwrap_or_else(|_| DEFAULT_OLLAMA_URL.to_string())
}

/// Remote template source base URL, with env override.
pub fn template_base_url() -> String {
    std::env::var("RADSCRIBE_TEMPLATE_URL")
        .unwrap_or_else(|_| DEFAULT_TEMPLATE_BASE_URL.to_string())
}

/// Explicit model override, if the operator set one.
pub fn model_override() -> Option<String> {
    std::env::var("RADSCRIBE_MODEL").ok().filter(|m| !m.trim().is_empty())
}

/// Default tracing filter when RUST_LOG is not set.
pub fn default_log_filter() -> &'static str {
    "radscribe=info"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("Radscribe"));
    }

    #[test]
    fn templates_dir_under_app_data() {
        let templates = templates_dir();
        let app = app_data_dir();
        assert!(templates.starts_with(app));
        assert!(templates.ends_with("templates"));
    }

    #[test]
    fn app_name_is_radscribe() {
        assert_eq!(APP_NAME, "Radscribe");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }
}
