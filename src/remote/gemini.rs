// src/remote/gemini.rs
//! Gemini client for search-grounded news generation.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use url::Url;

use crate::{
    config::Config,
    error::FeedError,
    prompt::build_news_prompt,
    remote::NewsProvider,
    utils::Language,
};

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
    tools: Vec<Tool>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

/// Tool-enabled configuration permitting web search grounding.
#[derive(Debug, Serialize)]
struct Tool {
    google_search: EmptyConfig,
}

#[derive(Debug, Serialize)]
struct EmptyConfig {}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

/// Grounded responses interleave text parts with non-text parts, so every
/// field is optional.
#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: Option<i64>,
    message: Option<String>,
    status: Option<String>,
}

/// Client-side pacing for Gemini API calls
struct RateLimiter {
    last_request: Instant,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(requests_per_second: u32) -> Self {
        Self {
            last_request: Instant::now() - Duration::from_secs(1),
            min_interval: Duration::from_millis(1000 / requests_per_second.max(1) as u64),
        }
    }

    async fn wait_if_needed(&mut self) {
        let elapsed = self.last_request.elapsed();
        if elapsed < self.min_interval {
            let wait_time = self.min_interval - elapsed;
            tokio::time::sleep(wait_time).await;
        }
        self.last_request = Instant::now();
    }
}

/// Classify an unsuccessful API response once, at the boundary.
///
/// HTTP 429 and a `RESOURCE_EXHAUSTED` status in the error body both mean
/// the quota is exhausted; everything else is a generic remote failure.
fn classify_api_error(status: StatusCode, body: &str) -> FeedError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return FeedError::RateLimited;
    }
    if let Ok(parsed) = serde_json::from_str::<ApiErrorResponse>(body) {
        if let Some(api_error) = parsed.error {
            if api_error.status.as_deref() == Some("RESOURCE_EXHAUSTED")
                || api_error.code == Some(429)
            {
                return FeedError::RateLimited;
            }
            return FeedError::RemoteApi(format!(
                "Gemini API error {}: {}",
                status,
                api_error.message.unwrap_or_default()
            ));
        }
    }
    FeedError::RemoteApi(format!("Gemini API error {}: {}", status, body))
}

/// Gemini client for the generateContent endpoint with search grounding.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: Url,
    rate_limiter: Arc<tokio::sync::Mutex<RateLimiter>>,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .user_agent("NewsFeedBot/1.0")
            .build()
            .expect("Failed to create HTTP client");

        let base_url = Url::parse(&config.gemini_api_base)
            .map_err(|e| FeedError::Config(format!("invalid GEMINI_API_BASE: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
            base_url,
            rate_limiter: Arc::new(tokio::sync::Mutex::new(RateLimiter::new(
                config.requests_per_second,
            ))),
        })
    }

    fn endpoint(&self) -> Result<Url, FeedError> {
        self.base_url
            .join(&format!("models/{}:generateContent", self.model))
            .map_err(|e| FeedError::Config(format!("invalid model endpoint: {}", e)))
    }

    /// Concatenate the text parts of the first candidate.
    fn extract_text(response: GenerateContentResponse) -> String {
        response
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl NewsProvider for GeminiClient {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn fetch_news(&self, language: Language, count: usize) -> Result<String, FeedError> {
        // Rate limiting
        self.rate_limiter.lock().await.wait_if_needed().await;

        let prompt = build_news_prompt(language, chrono::Utc::now(), count);
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            tools: vec![Tool {
                google_search: EmptyConfig {},
            }],
        };

        debug!("🔍 Requesting {} news articles ({})", count, language.code());

        let response = self
            .client
            .post(self.endpoint()?)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| FeedError::RemoteApi(format!("Gemini API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Gemini API returned {}: {}", status, body);
            return Err(classify_api_error(status, &body));
        }

        let body: GenerateContentResponse = response.json().await.map_err(|e| {
            FeedError::RemoteApi(format!("Failed to decode Gemini response: {}", e))
        })?;

        let text = Self::extract_text(body);
        if text.is_empty() {
            return Err(FeedError::RemoteApi(
                "Gemini response contained no text".to_string(),
            ));
        }

        debug!("✅ Received {} chars of generation text", text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_429_is_rate_limited() {
        let err = classify_api_error(StatusCode::TOO_MANY_REQUESTS, "");
        assert!(err.is_rate_limited());
    }

    #[test]
    fn resource_exhausted_body_is_rate_limited() {
        let body = r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        let err = classify_api_error(StatusCode::FORBIDDEN, body);
        assert!(err.is_rate_limited());
    }

    #[test]
    fn other_api_errors_are_generic() {
        let body = r#"{"error":{"code":400,"message":"Invalid argument","status":"INVALID_ARGUMENT"}}"#;
        let err = classify_api_error(StatusCode::BAD_REQUEST, body);
        assert!(matches!(err, FeedError::RemoteApi(_)));
    }

    #[test]
    fn unparseable_error_body_is_generic() {
        let err = classify_api_error(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert!(matches!(err, FeedError::RemoteApi(_)));
    }

    #[test]
    fn extract_text_joins_first_candidate_parts() {
        let response = GenerateContentResponse {
            candidates: Some(vec![
                Candidate {
                    content: Some(CandidateContent {
                        parts: Some(vec![
                            CandidatePart {
                                text: Some("[{".to_string()),
                            },
                            CandidatePart { text: None },
                            CandidatePart {
                                text: Some("}]".to_string()),
                            },
                        ]),
                    }),
                },
                Candidate {
                    content: Some(CandidateContent {
                        parts: Some(vec![CandidatePart {
                            text: Some("ignored second candidate".to_string()),
                        }]),
                    }),
                },
            ]),
        };
        assert_eq!(GeminiClient::extract_text(response), "[{}]");
    }

    #[test]
    fn extract_text_handles_empty_response() {
        let response = GenerateContentResponse { candidates: None };
        assert_eq!(GeminiClient::extract_text(response), "");
    }

    #[test]
    fn rate_limiter_interval_from_rps() {
        let limiter = RateLimiter::new(10);
        assert_eq!(limiter.min_interval, Duration::from_millis(100));
        // Zero is clamped rather than dividing by it.
        let clamped = RateLimiter::new(0);
        assert_eq!(clamped.min_interval, Duration::from_millis(1000));
    }

    #[test]
    fn request_serializes_with_search_tool() {
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: "hello".to_string(),
                }],
            }],
            tools: vec![Tool {
                google_search: EmptyConfig {},
            }],
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"google_search\":{}"));
        assert!(json.contains("\"text\":\"hello\""));
    }
}
