use std::time::Duration;

const DEFAULT_API_URL: &str = "http://localhost:3000";
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Where and how the client reaches the upload service.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }

    /// HOSPIREG_API_URL (or API_URL), defaulting to a local service.
    pub fn from_env() -> Self {
        let base_url = std::env::var("HOSPIREG_API_URL")
            .or_else(|_| std::env::var("API_URL"))
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(base_url)
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
