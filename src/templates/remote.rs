use super::{FallbackSource, TemplateSource};
use crate::config;

/// Remote template tier: read-only fetch of `{base}/{name}.txt` over HTTP,
/// with spaces in the name mapped to `%20`.
///
/// Every failure mode — connect error, timeout, non-2xx status — degrades to
/// absence so resolution falls through; nothing here ever reaches the caller
/// of `TemplateStore::get`.
pub struct RemoteTemplateSource {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl RemoteTemplateSource {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Source configured from the environment (RADSCRIBE_TEMPLATE_URL) with
    /// the short template-fetch timeout.
    pub fn from_env() -> Self {
        Self::new(
            &config::template_base_url(),
            config::REMOTE_TEMPLATE_TIMEOUT_SECS,
        )
    }

    fn url_for(&self, name: &str) -> String {
        format!("{}/{}.txt", self.base_url, name.replace(' ', "%20"))
    }
}

impl FallbackSource for RemoteTemplateSource {
    fn source(&self) -> TemplateSource {
        TemplateSource::Remote
    }

    fn lookup(&self, name: &str) -> Option<String> {
        let url = self.url_for(name);

        let response = match self.client.get(&url).send() {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(template = %name, error = %e, "remote template fetch failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(template = %name, status = %status, "remote template absent");
            return None;
        }

        match response.text() {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::debug!(template = %name, error = %e, "remote template body unreadable");
                None
            }
        }
    }

    fn warms_local_cache(&self) -> bool {
        true
    }
}
