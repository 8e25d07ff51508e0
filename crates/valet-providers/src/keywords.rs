//! Intent keyword lists and the news category table.
//!
//! Each provider exposes the keyword list that marks an utterance as
//! belonging to its domain; the conversation core folds these into its
//! lexicon. Matching is case-insensitive substring containment, so
//! multi-word phrases are legal entries.

use crate::types::NewsCategory;

/// Keywords that indicate a weather-related query.
pub static WEATHER: &[&str] = &[
    "weather",
    "temperature",
    "temp",
    "forecast",
    "rain",
    "snow",
    "sunny",
    "cloudy",
    "humidity",
    "wind",
    "storm",
    "hot",
    "cold",
    "warm",
    "cool",
    "degrees",
    "celsius",
    "fahrenheit",
    "precipitation",
    "climate",
];

/// Keywords that indicate a news-related query.
pub static NEWS: &[&str] = &[
    "news",
    "headlines",
    "latest",
    "breaking",
    "article",
    "report",
    "story",
    "what's happening",
    "current events",
    "today's news",
    "updates",
];

/// Keywords that indicate a calendar-related query.
///
/// Bare date words (today, tomorrow, next week) are deliberately absent:
/// they mark a date reference, not the calendar domain, and would
/// misroute queries like "will it rain today". Date words are handled by
/// entity extraction instead.
pub static CALENDAR: &[&str] = &[
    "calendar",
    "schedule",
    "meeting",
    "appointment",
    "event",
    "remind",
    "book",
    "plan",
    "agenda",
    "upcoming",
    "create event",
    "add to calendar",
    "what's on my calendar",
];

/// Per-category keyword table for news category detection, checked in
/// `NewsCategory::ALL` order.
static CATEGORY_KEYWORDS: &[(NewsCategory, &[&str])] = &[
    (
        NewsCategory::Business,
        &["business", "economy", "finance", "stock", "market", "trade", "company"],
    ),
    (
        NewsCategory::Entertainment,
        &["entertainment", "celebrity", "movie", "music", "tv", "show", "actor"],
    ),
    (
        NewsCategory::Health,
        &["health", "medical", "doctor", "hospital", "medicine", "disease", "virus"],
    ),
    (
        NewsCategory::Science,
        &["science", "research", "study", "discovery", "space", "innovation"],
    ),
    (
        NewsCategory::Sports,
        &["sports", "football", "basketball", "soccer", "baseball", "game", "team"],
    ),
    (
        NewsCategory::Technology,
        &[
            "technology",
            "tech",
            "computer",
            "software",
            "app",
            "digital",
            "ai",
            "artificial intelligence",
        ],
    ),
];

/// Detect a news category from a free-text query.
///
/// Returns the first category (in table order) with any keyword hit, so a
/// query mentioning both "market" and "tech" resolves to business.
pub fn detect_news_category(query: &str) -> Option<NewsCategory> {
    let query_lower = query.to_lowercase();
    for (category, keywords) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|k| query_lower.contains(k)) {
            return Some(*category);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_category_basic() {
        assert_eq!(detect_news_category("show me sports news"), Some(NewsCategory::Sports));
        assert_eq!(
            detect_news_category("celebrity gossip please"),
            Some(NewsCategory::Entertainment)
        );
        assert_eq!(detect_news_category("stock market report"), Some(NewsCategory::Business));
    }

    #[test]
    fn test_detect_category_case_insensitive() {
        assert_eq!(detect_news_category("HEALTH updates"), Some(NewsCategory::Health));
    }

    #[test]
    fn test_detect_category_none() {
        assert_eq!(detect_news_category("tell me a joke"), None);
    }

    #[test]
    fn test_detect_category_technology() {
        assert_eq!(detect_news_category("technology"), Some(NewsCategory::Technology));
        assert_eq!(
            detect_news_category("Show me technology news"),
            Some(NewsCategory::Technology)
        );
    }

    #[test]
    fn test_detect_category_table_order_wins() {
        // "business" precedes "sports" in the table; a query hitting both
        // resolves to the earlier category.
        assert_eq!(
            detect_news_category("sports business roundup"),
            Some(NewsCategory::Business)
        );
    }

    #[test]
    fn test_keyword_lists_nonempty() {
        assert_eq!(WEATHER.len(), 20);
        assert_eq!(NEWS.len(), 11);
        assert_eq!(CALENDAR.len(), 13);
    }
}
