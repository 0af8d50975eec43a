use std::time::Duration;

pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

pub const DEFAULT_CONCURRENCY: usize = 4;

pub const DEFAULT_CACHE_TTL_SECS: u64 = 600;

pub const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

pub const DEFAULT_USER_AGENT: &str = concat!("shortlist/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ReputationConfig {
    /// Per-lookup deadline. A lookup that exceeds it counts as a failure.
    pub timeout: Duration,

    /// Max candidates enriched at once.
    pub concurrency: usize,

    /// Token used for GitHub when a request does not supply one.
    pub github_token: Option<String>,

    pub cache_ttl: Duration,

    pub cache_capacity: u64,

    pub user_agent: String,
}

impl Default for ReputationConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            concurrency: DEFAULT_CONCURRENCY,
            github_token: None,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ReputationConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_github_token(mut self, token: impl Into<String>) -> Self {
        self.github_token = Some(token.into());
        self
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }
}
