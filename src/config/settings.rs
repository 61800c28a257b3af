use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_api_base: String,
    pub gemini_model: String,
    pub cache_ttl_secs: u64,
    pub article_batch_size: usize,
    pub request_timeout_ms: u64,
    pub requests_per_second: u32,
    pub cache_file_path: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            gemini_api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
            gemini_api_base: env::var("GEMINI_API_BASE").unwrap_or_else(|_| {
                "https://generativelanguage.googleapis.com/v1beta/".to_string()
            }),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
            cache_ttl_secs: env::var("NEWS_CACHE_TTL_SECS")
                .unwrap_or_else(|_| "900".to_string())
                .parse()
                .unwrap_or(900),
            article_batch_size: env::var("NEWS_BATCH_SIZE")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),
            request_timeout_ms: env::var("NEWS_REQUEST_TIMEOUT_MS")
                .unwrap_or_else(|_| "30000".to_string())
                .parse()
                .unwrap_or(30000),
            requests_per_second: env::var("NEWS_REQUESTS_PER_SECOND")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .unwrap_or(1),
            cache_file_path: env::var("NEWS_CACHE_FILE").ok(),
        }
    }

    pub fn validate_and_log(&self) {
        // The API key is deliberately left out of the log line.
        log::info!(
            "Application Configuration Loaded: model={}, base={}, ttl={}s, batch={}, timeout={}ms, pacing={}rps, cache_file={:?}",
            self.gemini_model,
            self.gemini_api_base,
            self.cache_ttl_secs,
            self.article_batch_size,
            self.request_timeout_ms,
            self.requests_per_second,
            self.cache_file_path,
        );
        if self.gemini_api_key.is_empty() {
            log::error!("GEMINI_API_KEY is not set.");
        }
    }
}
