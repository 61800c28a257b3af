pub mod settings;

// Re-export the primary Config struct for a cleaner import path.
pub use settings::Config;

use crate::error::FeedError;
use std::sync::Arc;

/// Loads and returns the application configuration as an `Arc<Config>`.
/// It centralizes the configuration loading process.
pub fn load_config() -> Result<Arc<Config>, FeedError> {
    dotenv::dotenv().ok(); // Load .env file if present, ignore errors

    let config = Config::from_env();

    if config.gemini_api_key.is_empty() {
        return Err(FeedError::Config(
            "GEMINI_API_KEY cannot be empty".to_string(),
        ));
    }
    if config.article_batch_size == 0 {
        return Err(FeedError::Config(
            "NEWS_BATCH_SIZE must be at least 1".to_string(),
        ));
    }

    config.validate_and_log();

    Ok(Arc::new(config))
}
