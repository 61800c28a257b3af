//! Shared domain types and helpers used across the feed modules.

use chrono::Utc;
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported feed languages. `En` is the primary locale, `Zh` the
/// Traditional Chinese alternate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    En,
    Zh,
}

impl Language {
    /// Stable code used in cache keys and CLI arguments.
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Zh => "zh",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "zh" => Ok(Language::Zh),
            other => Err(format!("unsupported language '{}' (expected en or zh)", other)),
        }
    }
}

/// A single news article as surfaced to the presentation layer.
///
/// `id` is synthesized at parse time from the current epoch millis plus the
/// article's index within its batch; it is distinct within a batch only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub summary: String,
    pub category: String,
    #[serde(rename = "sourceUrl")]
    pub source_url: String,
}

/// Current time as epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

pub fn setup_logging() -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}] {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Info)
        .level_for("reqwest", log::LevelFilter::Warn)
        .level_for("hyper", log::LevelFilter::Warn)
        .chain(std::io::stdout())
        .apply()?;
    info!("Logging initialized.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_codes_round_trip() {
        for lang in [Language::En, Language::Zh] {
            assert_eq!(lang.code().parse::<Language>().unwrap(), lang);
        }
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn article_serde_uses_camel_case_source_url() {
        let article = Article {
            id: 7,
            title: "t".to_string(),
            summary: "s".to_string(),
            category: "c".to_string(),
            source_url: "u".to_string(),
        };
        let json = serde_json::to_string(&article).unwrap();
        assert!(json.contains("\"sourceUrl\":\"u\""));
        let back: Article = serde_json::from_str(&json).unwrap();
        assert_eq!(back, article);
    }
}
