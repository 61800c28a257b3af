// src/fallback.rs
//! Hardcoded sample articles and the user-facing failure messages.
//!
//! The sample set is the last resort of the refresh fallback: shown only
//! when a fetch fails and no cached payload of any age is usable.

use crate::error::FeedError;
use crate::utils::Article;
use once_cell::sync::Lazy;

/// Fixed two-item sample set, English-language Hong Kong business and
/// community topics.
pub static SAMPLE_ARTICLES: Lazy<Vec<Article>> = Lazy::new(|| {
    vec![
        Article {
            id: 1,
            title: "Hong Kong SMEs Accelerate Digital Payment Adoption".to_string(),
            summary: "Small and medium-sized businesses across Hong Kong are adopting digital \
                      payment platforms at a record pace, with industry surveys showing more \
                      than half of local retailers now accepting at least one form of mobile \
                      payment. Trade bodies credit government voucher schemes and falling \
                      transaction fees for the shift, while older merchants in wet markets and \
                      neighbourhood shops are being supported through subsidised onboarding \
                      programmes. Analysts expect the trend to reshape the city's retail \
                      landscape over the coming year."
                .to_string(),
            category: "Business".to_string(),
            source_url: "https://www.scmp.com/business".to_string(),
        },
        Article {
            id: 2,
            title: "Community Centres Expand Support Programmes for Local Entrepreneurs"
                .to_string(),
            summary: "District community centres in Kowloon and the New Territories are \
                      expanding mentorship and co-working programmes aimed at first-time \
                      entrepreneurs. The initiative pairs experienced business owners with \
                      residents launching home-grown brands, from food products to design \
                      studios, and offers subsidised stalls at weekend markets. Organisers say \
                      demand has doubled since the programme began, and several graduates have \
                      moved on to permanent shopfronts in their own neighbourhoods."
                .to_string(),
            category: "Community".to_string(),
            source_url: "https://www.news.gov.hk".to_string(),
        },
    ]
});

pub const REFRESH_ERROR_MESSAGE: &str =
    "Unable to load the latest news right now. Showing recent articles instead.";
pub const REFRESH_RATE_LIMIT_MESSAGE: &str = "The news service is busy right now. Showing \
     recent articles instead - please try again in a few minutes.";
pub const LOAD_MORE_ERROR_MESSAGE: &str = "Could not load more articles. Please try again later.";
pub const LOAD_MORE_RATE_LIMIT_MESSAGE: &str =
    "Could not load more articles - the news service is busy. Please try again in a few minutes.";

/// Message shown after a failed refresh. Wording is rate-limit specific
/// but the surrounding control flow never branches on the error kind.
pub fn refresh_message(error: &FeedError) -> &'static str {
    if error.is_rate_limited() {
        REFRESH_RATE_LIMIT_MESSAGE
    } else {
        REFRESH_ERROR_MESSAGE
    }
}

/// Message shown after a failed load-more.
pub fn load_more_message(error: &FeedError) -> &'static str {
    if error.is_rate_limited() {
        LOAD_MORE_RATE_LIMIT_MESSAGE
    } else {
        LOAD_MORE_ERROR_MESSAGE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_set_has_exactly_two_items() {
        assert_eq!(SAMPLE_ARTICLES.len(), 2);
        assert_eq!(SAMPLE_ARTICLES[0].category, "Business");
        assert_eq!(SAMPLE_ARTICLES[1].category, "Community");
    }

    #[test]
    fn message_selection_follows_error_kind() {
        assert_eq!(
            refresh_message(&FeedError::RateLimited),
            REFRESH_RATE_LIMIT_MESSAGE
        );
        assert_eq!(
            refresh_message(&FeedError::RemoteApi("x".to_string())),
            REFRESH_ERROR_MESSAGE
        );
        assert_eq!(
            load_more_message(&FeedError::RateLimited),
            LOAD_MORE_RATE_LIMIT_MESSAGE
        );
        assert_eq!(
            load_more_message(&FeedError::NoJsonArray),
            LOAD_MORE_ERROR_MESSAGE
        );
    }
}
