use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum FeedError {
    /// Corrupt JSON found in the cache store
    #[error("Cache Read Error: {0}")]
    CacheRead(String),

    /// Remote API rate limit exceeded (HTTP 429 / RESOURCE_EXHAUSTED)
    #[error("News API rate limit exceeded")]
    RateLimited,

    /// Network or API failures from the remote query
    #[error("News API Error: {0}")]
    RemoteApi(String),

    /// Response text carried no JSON array at all
    #[error("no JSON array found in response")]
    NoJsonArray,

    /// A JSON array was present but did not decode into article records
    #[error("failed to parse news data: {0}")]
    ParseFailed(String),

    /// Configuration errors
    #[error("Config Error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        FeedError::ParseFailed(err.to_string())
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        if err.status() == Some(reqwest::StatusCode::TOO_MANY_REQUESTS) {
            return FeedError::RateLimited;
        }
        FeedError::RemoteApi(err.to_string())
    }
}

impl FeedError {
    /// Rate-limit failures get distinct user-facing wording; control flow
    /// is otherwise identical across error kinds.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, FeedError::RateLimited)
    }
}
