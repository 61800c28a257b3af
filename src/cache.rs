// src/cache.rs
//! Client-side caching layer for fetched news batches.
//!
//! Storage is an injectable synchronous key/value interface; the store never
//! expires entries itself. Freshness is computed here from the timestamp
//! embedded in each payload.

use crate::error::FeedError;
use crate::utils::{now_millis, Article, Language};
use dashmap::DashMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

const CACHE_KEY_PREFIX: &str = "news_cache";

/// One cached batch of articles for a single language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachePayload {
    pub timestamp: i64,
    pub articles: Vec<Article>,
}

impl CachePayload {
    /// Fresh iff younger than the TTL and non-empty. Payloads failing
    /// either test are never served as current content.
    pub fn is_fresh(&self, now: i64, ttl_millis: i64) -> bool {
        now - self.timestamp < ttl_millis && !self.articles.is_empty()
    }
}

/// Cache key for a language's payload slot. One payload per language.
pub fn cache_key(language: Language) -> String {
    format!("{}:{}", CACHE_KEY_PREFIX, language.code())
}

/// Synchronous key/value storage backing the cache, scoped to this
/// process the way the original per-origin storage was scoped to a browser
/// origin. Implementations carry no expiry mechanism of their own.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn remove(&self, key: &str);
}

/// In-memory store over a sharded map. The default for tests and for
/// callers that do not want persistence.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: DashMap<String, String>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryCacheStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    fn set(&self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }
}

/// File-backed store: a single JSON object, loaded once at construction and
/// rewritten on every mutation. A corrupt or unreadable file is discarded
/// with a warning and the store starts empty.
#[derive(Debug)]
pub struct FileCacheStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileCacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<HashMap<String, String>>(&raw) {
                Ok(map) => {
                    debug!("Loaded {} cache entries from {}", map.len(), path.display());
                    map
                }
                Err(e) => {
                    warn!("Corrupt cache file {}: {}. Starting empty.", path.display(), e);
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn persist(&self, entries: &HashMap<String, String>) {
        match serde_json::to_string_pretty(entries) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&self.path, json) {
                    warn!("Failed to write cache file {}: {}", self.path.display(), e);
                }
            }
            Err(e) => warn!("Failed to serialize cache entries: {}", e),
        }
    }
}

impl CacheStore for FileCacheStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(key.to_string(), value);
        self.persist(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap();
        if entries.remove(key).is_some() {
            self.persist(&entries);
        }
    }
}

/// Typed wrapper over a [`CacheStore`], owning key generation, payload
/// (de)serialization and the freshness policy.
pub struct NewsCache {
    store: Arc<dyn CacheStore>,
    ttl_millis: i64,
}

impl NewsCache {
    pub fn new(store: Arc<dyn CacheStore>, ttl_millis: i64) -> Self {
        Self { store, ttl_millis }
    }

    /// Decode the payload for `language`, if any. A corrupt entry is
    /// reported as `CacheRead`; callers discard it via [`Self::remove`].
    pub fn get_payload(&self, language: Language) -> Result<Option<CachePayload>, FeedError> {
        let key = cache_key(language);
        match self.store.get(&key) {
            None => {
                debug!("Cache MISS for key: {}", key);
                Ok(None)
            }
            Some(raw) => {
                debug!("Cache HIT for key: {}. Deserializing...", key);
                serde_json::from_str::<CachePayload>(&raw)
                    .map(Some)
                    .map_err(|e| {
                        warn!("Failed to deserialize cached payload for key {}: {}", key, e);
                        FeedError::CacheRead(format!("corrupt payload for key {}: {}", key, e))
                    })
            }
        }
    }

    /// Look up a payload eligible to be served without a remote query.
    ///
    /// Corrupt entries and stale-empty entries are removed on the spot.
    /// A stale but non-empty entry is left in place so the fallback policy
    /// can still adopt it after a failed fetch.
    pub fn lookup_fresh(&self, language: Language) -> Option<CachePayload> {
        match self.get_payload(language) {
            Err(_) => {
                self.remove(language);
                None
            }
            Ok(None) => None,
            Ok(Some(payload)) => {
                if payload.is_fresh(now_millis(), self.ttl_millis) {
                    return Some(payload);
                }
                if payload.articles.is_empty() {
                    self.remove(language);
                }
                None
            }
        }
    }

    /// Articles usable by the refresh fallback: any non-empty payload,
    /// regardless of age. Corrupt entries yield nothing.
    pub fn stale_articles(&self, language: Language) -> Option<Vec<Article>> {
        match self.get_payload(language) {
            Ok(Some(payload)) if !payload.articles.is_empty() => Some(payload.articles),
            _ => None,
        }
    }

    pub fn store_payload(&self, language: Language, payload: &CachePayload) {
        let key = cache_key(language);
        match serde_json::to_string(payload) {
            Ok(json) => {
                debug!("Cache SET for key: {} ({} articles)", key, payload.articles.len());
                self.store.set(&key, json);
            }
            Err(e) => warn!("Failed to serialize payload for key {}: {}", key, e),
        }
    }

    pub fn remove(&self, language: Language) {
        let key = cache_key(language);
        debug!("Cache DEL for key: {}", key);
        self.store.remove(&key);
    }
}
