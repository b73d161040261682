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

/// Tuning knobs for one analysis run, passed to the orchestrator at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub max_ads_per_brand: usize,
    pub days_back: u32,
    pub classify_batch_size: usize,
    /// Characters of body text sent per creative in a classification prompt.
    pub classify_text_prefix_chars: usize,
    /// Classification batches in flight at once. Clamped to 1..=2.
    pub classify_concurrency: usize,
    /// Brand retrievals in flight at once.
    pub retrieval_concurrency: usize,
    pub retrieval_timeout_secs: u64,
    pub classify_timeout_secs: u64,
    pub recommend_timeout_secs: u64,
    pub max_recommendations: usize,
    /// Below this many competitors with ads the run completes with a warning.
    pub min_competitors_with_ads: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_ads_per_brand: 50,
            days_back: 30,
            classify_batch_size: 8,
            classify_text_prefix_chars: 400,
            classify_concurrency: 1,
            retrieval_concurrency: 6,
            retrieval_timeout_secs: 90,
            classify_timeout_secs: 120,
            recommend_timeout_secs: 180,
            max_recommendations: 10,
            min_competitors_with_ads: 3,
        }
    }
}

impl AnalysisConfig {
    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.classify_batch_size.max(1)
    }

    #[must_use]
    pub fn classify_workers(&self) -> usize {
        self.classify_concurrency.clamp(1, 2)
    }

    #[must_use]
    pub fn retrieval_workers(&self) -> usize {
        self.retrieval_concurrency.max(1)
    }

    #[must_use]
    pub fn retrieval_timeout(&self) -> Duration {
        Duration::from_secs(self.retrieval_timeout_secs)
    }

    #[must_use]
    pub fn classify_timeout(&self) -> Duration {
        Duration::from_secs(self.classify_timeout_secs)
    }

    #[must_use]
    pub fn recommend_timeout(&self) -> Duration {
        Duration::from_secs(self.recommend_timeout_secs)
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub ad_library_url: String,
    pub ad_library_token: Option<String>,
    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    pub scraper_inter_request_delay_ms: u64,
    pub scraper_max_retries: u32,
    pub scraper_retry_backoff_base_secs: u64,
    pub anthropic_api_key: Option<String>,
    pub llm_url: String,
    pub llm_model: String,
    pub llm_max_tokens: u32,
    pub llm_request_timeout_secs: u64,
    pub analysis: AnalysisConfig,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("ad_library_url", &self.ad_library_url)
            .field(
                "ad_library_token",
                &self.ad_library_token.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "scraper_request_timeout_secs",
                &self.scraper_request_timeout_secs,
            )
            .field("scraper_user_agent", &self.scraper_user_agent)
            .field(
                "scraper_inter_request_delay_ms",
                &self.scraper_inter_request_delay_ms,
            )
            .field("scraper_max_retries", &self.scraper_max_retries)
            .field(
                "scraper_retry_backoff_base_secs",
                &self.scraper_retry_backoff_base_secs,
            )
            .field(
                "anthropic_api_key",
                &self.anthropic_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("llm_url", &self.llm_url)
            .field("llm_model", &self.llm_model)
            .field("llm_max_tokens", &self.llm_max_tokens)
            .field("llm_request_timeout_secs", &self.llm_request_timeout_secs)
            .field("analysis", &self.analysis)
            .finish()
    }
}
