// src/parser.rs
//! Best-effort extraction of the article array out of the model's
//! free-form response text.
//!
//! The model is instructed to emit only a JSON array, but in practice it
//! sometimes wraps the array in conversational text or markdown fences.
//! We slice from the first `[` to the last `]` and decode that substring;
//! no deeper recovery (bracket-balance repair etc.) is attempted.

use crate::error::FeedError;
use crate::utils::{now_millis, Article};
use log::debug;
use serde::Deserialize;

/// Article fields as emitted by the model, before an id is assigned.
#[derive(Debug, Deserialize)]
struct RawArticle {
    title: String,
    summary: String,
    category: String,
    #[serde(rename = "sourceUrl")]
    source_url: String,
}

fn extract_json_array(text: &str) -> Result<&str, FeedError> {
    let start = text.find('[').ok_or(FeedError::NoJsonArray)?;
    let end = text.rfind(']').ok_or(FeedError::NoJsonArray)?;
    if end < start {
        return Err(FeedError::NoJsonArray);
    }
    Ok(&text[start..=end])
}

/// Decode the raw response text into articles, assigning each a synthetic
/// id of current epoch millis plus its index in the batch. Uniqueness is
/// guaranteed within one batch only.
pub fn parse_articles(text: &str) -> Result<Vec<Article>, FeedError> {
    let json = extract_json_array(text)?;
    let raw: Vec<RawArticle> = serde_json::from_str(json)?;
    debug!("Parsed {} articles from response text", raw.len());

    let base_id = now_millis();
    Ok(raw
        .into_iter()
        .enumerate()
        .map(|(index, record)| Article {
            id: base_id + index as i64,
            title: record.title,
            summary: record.summary,
            category: record.category,
            source_url: record.source_url,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_array_wrapped_in_noise() {
        let text = r#"noise {not json} [ {"title":"A","summary":"s","category":"c","sourceUrl":"u"} ] trailing"#;
        let articles = parse_articles(text).unwrap();

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "A");
        assert_eq!(articles[0].summary, "s");
        assert_eq!(articles[0].category, "c");
        assert_eq!(articles[0].source_url, "u");
        assert!(articles[0].id > 0);
    }

    #[test]
    fn extracts_array_from_markdown_fence() {
        let text = "Here you go:\n```json\n[{\"title\":\"A\",\"summary\":\"s\",\"category\":\"c\",\"sourceUrl\":\"u\"}]\n```";
        assert_eq!(parse_articles(text).unwrap().len(), 1);
    }

    #[test]
    fn missing_open_bracket_is_no_json_array() {
        let result = parse_articles("sorry, I could not find any news today");
        assert!(matches!(result, Err(FeedError::NoJsonArray)));
    }

    #[test]
    fn missing_close_bracket_is_no_json_array() {
        let result = parse_articles("here it comes: [ {\"title\":\"A\"");
        assert!(matches!(result, Err(FeedError::NoJsonArray)));
    }

    #[test]
    fn close_before_open_is_no_json_array() {
        let result = parse_articles("] and then much later [");
        assert!(matches!(result, Err(FeedError::NoJsonArray)));
    }

    #[test]
    fn undecodable_array_is_parse_failed() {
        let result = parse_articles("[ {\"title\": \"A\" ]");
        assert!(matches!(result, Err(FeedError::ParseFailed(_))));
    }

    #[test]
    fn missing_fields_are_parse_failed() {
        let result = parse_articles(r#"[{"title":"A","summary":"s"}]"#);
        assert!(matches!(result, Err(FeedError::ParseFailed(_))));
    }

    #[test]
    fn ids_increment_by_index_within_a_batch() {
        let text = r#"[
            {"title":"A","summary":"s","category":"c","sourceUrl":"u"},
            {"title":"B","summary":"s","category":"c","sourceUrl":"u"},
            {"title":"C","summary":"s","category":"c","sourceUrl":"u"}
        ]"#;
        let articles = parse_articles(text).unwrap();
        assert_eq!(articles[1].id, articles[0].id + 1);
        assert_eq!(articles[2].id, articles[0].id + 2);
    }

    #[test]
    fn empty_array_parses_to_no_articles() {
        assert_eq!(parse_articles("[]").unwrap().len(), 0);
    }
}
