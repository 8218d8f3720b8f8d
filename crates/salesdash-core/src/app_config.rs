use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Endpoint returning the JSON list of sales.
    pub api_url: String,
    pub user_agent: String,
    /// Local CSV copy used when the API cannot be reached.
    pub fallback_path: PathBuf,
    pub max_attempts: u32,
    pub request_timeout_secs: u64,
    /// Growth factor between retry waits; must be greater than 1.
    pub backoff_base: f64,
    /// Length of one backoff unit; the wait after attempt `i` is
    /// `backoff_unit_ms * backoff_base^i`.
    pub backoff_unit_ms: u64,
}

impl AppConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub fn backoff_unit(&self) -> Duration {
        Duration::from_millis(self.backoff_unit_ms)
    }
}
