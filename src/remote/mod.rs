// src/remote/mod.rs
//! Remote query adapters for news generation.

pub mod gemini;

pub use gemini::GeminiClient;

use crate::error::FeedError;
use crate::utils::Language;
use async_trait::async_trait;
use std::time::Instant;

/// Health snapshot for a news provider.
#[derive(Debug, Clone)]
pub struct ProviderHealth {
    pub is_healthy: bool,
    pub response_time_ms: Option<u64>,
    pub status_message: String,
}

/// A remote source of news summaries.
///
/// Implementations return the raw generation text; extraction of the
/// article array happens in the parser, not here. Each call is a single
/// attempt - no retry or backoff happens at this layer or above.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Query for `count` articles in `language`, returning raw text.
    ///
    /// Rate-limit failures must be classified here, at the boundary, into
    /// [`FeedError::RateLimited`] so callers never string-match errors.
    async fn fetch_news(&self, language: Language, count: usize) -> Result<String, FeedError>;

    /// Probe the provider with a minimal query, timing the round trip.
    async fn health_check(&self) -> ProviderHealth {
        let start = Instant::now();
        match self.fetch_news(Language::En, 1).await {
            Ok(_) => ProviderHealth {
                is_healthy: true,
                response_time_ms: Some(start.elapsed().as_millis() as u64),
                status_message: format!("{} responding normally", self.name()),
            },
            Err(e) => ProviderHealth {
                is_healthy: false,
                response_time_ms: None,
                status_message: format!("{} error: {}", self.name(), e),
            },
        }
    }
}
