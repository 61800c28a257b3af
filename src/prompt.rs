// src/prompt.rs
//! Prompt construction for the news query.
//!
//! Two variants, selected by language. They differ only in wording and in
//! the locale formatting of the month; the semantic request is identical:
//! `count` Hong Kong news items for the current month, each with a title,
//! a 100-150 word summary, a category and a direct source URL, emitted as
//! a single JSON array with no surrounding text.

use crate::utils::Language;
use chrono::{DateTime, Datelike, Duration, Utc};

/// Hong Kong is UTC+8; the offset only matters near month boundaries.
fn hong_kong_time(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::hours(8)
}

pub fn build_news_prompt(language: Language, now: DateTime<Utc>, count: usize) -> String {
    let local = hong_kong_time(now);
    match language {
        Language::En => format!(
            "Search for the {count} most significant Hong Kong news stories of {month_year}. \
             Respond with ONLY a single JSON array and nothing else - no introduction, no \
             markdown, no trailing commentary. Each element must be an object with exactly \
             these keys: \"title\", \"summary\" (a 100-150 word summary), \"category\", and \
             \"sourceUrl\" (a direct link to the source article).",
            count = count,
            month_year = local.format("%B %Y"),
        ),
        Language::Zh => format!(
            "請搜尋{year}年{month}月香港最重要的{count}則新聞。只輸出一個 JSON 陣列,不要任何其他文字、\
              前言或 markdown。每個元素必須是包含以下鍵的物件:\"title\"(標題)、\"summary\"\
             (100至150字的摘要)、\"category\"(分類)、\"sourceUrl\"(新聞來源的直接連結)。",
            year = local.year(),
            month = local.month(),
            count = count,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn english_prompt_names_the_current_month() {
        let now = Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap();
        let prompt = build_news_prompt(Language::En, now, 5);
        assert!(prompt.contains("August 2026"));
        assert!(prompt.contains("5 most significant Hong Kong news"));
        assert!(prompt.contains("JSON array"));
    }

    #[test]
    fn chinese_prompt_uses_numeric_month() {
        let now = Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap();
        let prompt = build_news_prompt(Language::Zh, now, 5);
        assert!(prompt.contains("2026年8月"));
        assert!(prompt.contains("5則新聞"));
        assert!(prompt.contains("JSON 陣列"));
    }

    #[test]
    fn both_variants_request_the_same_keys() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        for lang in [Language::En, Language::Zh] {
            let prompt = build_news_prompt(lang, now, 5);
            for key in ["\"title\"", "\"summary\"", "\"category\"", "\"sourceUrl\""] {
                assert!(prompt.contains(key), "{:?} prompt missing {}", lang, key);
            }
        }
    }

    #[test]
    fn month_rolls_over_in_hong_kong_before_utc() {
        // 2026-07-31 20:00 UTC is already August 1st in Hong Kong.
        let now = Utc.with_ymd_and_hms(2026, 7, 31, 20, 0, 0).unwrap();
        let prompt = build_news_prompt(Language::En, now, 5);
        assert!(prompt.contains("August 2026"));
    }
}
