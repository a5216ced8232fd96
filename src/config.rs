use std::path::PathBuf;
use std::time::Duration;

/// Platform the suite targets when no base URL is given
pub const DEFAULT_BASE_URL: &str = "https://velocitix-funded.preview.emergentagent.com";

/// Runner configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Scheme and host of the platform, without the `/api` suffix
    pub base_url: String,

    /// Per-request timeout (ms)
    pub request_timeout_ms: u64,

    /// Demo account email sent by the login step
    pub demo_email: String,

    /// Demo account password sent by the login step
    pub demo_password: String,

    /// Where to write JSON and JUnit reports, if anywhere
    pub report_dir: Option<PathBuf>,
}

impl Config {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_ms: 30_000,
            demo_email: "demo@tradex.com".to_string(),
            demo_password: "demo123".to_string(),
            report_dir: None,
        }
    }
}
