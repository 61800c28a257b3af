// src/feed.rs
//! The fetch/cache/fallback orchestrator behind the news feed.
//!
//! A refresh replaces the whole article list and may be served straight
//! from a fresh cache slot; a load-more always hits the remote provider
//! and appends. Every failure is absorbed into view state - nothing here
//! returns an error to the caller.

use crate::cache::{CachePayload, CacheStore, NewsCache};
use crate::config::Config;
use crate::error::FeedError;
use crate::fallback::{self, SAMPLE_ARTICLES};
use crate::parser::parse_articles;
use crate::remote::NewsProvider;
use crate::utils::{now_millis, Article, Language};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// View state handed to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedSnapshot {
    pub articles: Vec<Article>,
    /// True while an initial refresh fetch is in flight.
    pub loading: bool,
    /// True while a load-more fetch is in flight.
    pub fetching_more: bool,
    pub error: Option<String>,
}

pub struct FeedService {
    provider: Arc<dyn NewsProvider>,
    cache: NewsCache,
    batch_size: usize,
    state: Mutex<FeedSnapshot>,
    /// Guard against re-entrant load-more; nothing else enforces mutual
    /// exclusion between two load-more tasks.
    fetching_more: AtomicBool,
    /// Bumped by every refresh. A completing fetch commits only if its
    /// generation is still current, so a language switch mid-flight never
    /// reverts visible state to the older language.
    generation: AtomicU64,
}

impl FeedService {
    pub fn new(
        provider: Arc<dyn NewsProvider>,
        store: Arc<dyn CacheStore>,
        config: &Config,
    ) -> Self {
        Self {
            provider,
            cache: NewsCache::new(store, config.cache_ttl_secs as i64 * 1000),
            batch_size: config.article_batch_size,
            state: Mutex::new(FeedSnapshot::default()),
            fetching_more: AtomicBool::new(false),
            generation: AtomicU64::new(0),
        }
    }

    pub async fn snapshot(&self) -> FeedSnapshot {
        self.state.lock().await.clone()
    }

    /// Full refresh for `language`: cache check, remote query, cache write.
    /// Invoked on every language change.
    pub async fn refresh(&self, language: Language) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        // A fresh cache slot short-circuits the network entirely.
        if let Some(payload) = self.cache.lookup_fresh(language) {
            info!(
                "📰 Serving {} cached articles for '{}'",
                payload.articles.len(),
                language.code()
            );
            let mut state = self.state.lock().await;
            state.articles = payload.articles;
            state.error = None;
            // An older in-flight refresh we just superseded may have set
            // the flag; it will not clear it once it sees the generation.
            state.loading = false;
            return;
        }

        {
            let mut state = self.state.lock().await;
            state.error = None;
            state.loading = true;
        }

        let result = self.fetch_batch(language).await;

        let mut state = self.state.lock().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            // A newer refresh owns the view state now, including `loading`.
            debug!("Discarding superseded refresh (generation {})", generation);
            return;
        }

        match result {
            Ok(articles) => {
                info!(
                    "✅ Refreshed {} articles for '{}'",
                    articles.len(),
                    language.code()
                );
                self.cache.store_payload(
                    language,
                    &CachePayload {
                        timestamp: now_millis(),
                        articles: articles.clone(),
                    },
                );
                state.articles = articles;
                state.error = None;
            }
            Err(e) => {
                warn!("⚠️ Refresh failed for '{}': {}", language.code(), e);
                self.apply_refresh_fallback(&mut state, language, &e);
            }
        }
        state.loading = false;
    }

    /// Additive fetch: a fresh independent query, never served from cache.
    /// A call while another load-more is in flight is a no-op.
    pub async fn load_more(&self, language: Language) {
        if self
            .fetching_more
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("load_more already in flight, ignoring");
            return;
        }

        let generation = self.generation.load(Ordering::SeqCst);

        {
            let mut state = self.state.lock().await;
            state.fetching_more = true;
            state.error = None;
        }

        let result = self.fetch_batch(language).await;

        let mut state = self.state.lock().await;
        if self.generation.load(Ordering::SeqCst) == generation {
            match result {
                Ok(batch) => {
                    info!(
                        "✅ Loaded {} more articles for '{}'",
                        batch.len(),
                        language.code()
                    );
                    state.articles.extend(batch);
                    self.cache.store_payload(
                        language,
                        &CachePayload {
                            timestamp: now_millis(),
                            articles: state.articles.clone(),
                        },
                    );
                }
                Err(e) => {
                    warn!("⚠️ Load more failed for '{}': {}", language.code(), e);
                    // Existing articles and cache stay untouched.
                    state.error = Some(fallback::load_more_message(&e).to_string());
                }
            }
        } else {
            debug!("Discarding superseded load-more result");
        }
        state.fetching_more = false;
        self.fetching_more.store(false, Ordering::SeqCst);
    }

    async fn fetch_batch(&self, language: Language) -> Result<Vec<Article>, FeedError> {
        let text = self.provider.fetch_news(language, self.batch_size).await?;
        parse_articles(&text)
    }

    /// Failed refresh: prefer a cached payload of any age over the sample
    /// set. The cached slot is adopted as-is, its timestamp untouched.
    fn apply_refresh_fallback(
        &self,
        state: &mut FeedSnapshot,
        language: Language,
        error: &FeedError,
    ) {
        match self.cache.stale_articles(language) {
            Some(articles) => {
                info!(
                    "📦 Falling back to {} cached articles for '{}'",
                    articles.len(),
                    language.code()
                );
                state.articles = articles;
            }
            None => {
                info!(
                    "📦 No usable cache for '{}', falling back to sample articles",
                    language.code()
                );
                state.articles = SAMPLE_ARTICLES.clone();
            }
        }
        state.error = Some(fallback::refresh_message(error).to_string());
    }
}
