use std::time::Duration;

/// Records requested per page. Fixed so a single run cannot hammer the source.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// "No practical cap" for callers that don't bound a run.
pub const UNBOUNDED: usize = usize::MAX;

pub const DEFAULT_BASE_URL: &str = "https://api.itjobs.pt/";
pub const LIST_PATH: &str = "job/list.json";
pub const DETAIL_PATH: &str = "job/get.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Everything the HTTP transport needs, injected at construction.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        ClientConfig {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: String::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
