//! Pattern-based entity extraction.
//!
//! Pulls structured values out of an utterance, conditioned on the intent
//! it classified into. All patterns are compiled once and reused.
//! Deterministic and infallible: a pattern that does not match simply
//! leaves its entity absent.

use regex::Regex;
use std::sync::LazyLock;

use crate::types::{Conversation, DateReference, Entities, IntentKind, TimeReference};
use valet_providers::{keywords, CalendarAction};

// =============================================================================
// Compiled patterns
// =============================================================================

/// Location phrases: "... in <place>", "... for <place>", "... at <place>",
/// "weather <place>". Tried in order; the capture is lazy, so it stops at
/// the first whitespace or sentence-terminating punctuation.
static LOCATION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)in\s+([A-Za-z\s,]+?)(?:\s|$|[?.!])",
        r"(?i)for\s+([A-Za-z\s,]+?)(?:\s|$|[?.!])",
        r"(?i)at\s+([A-Za-z\s,]+?)(?:\s|$|[?.!])",
        r"(?i)weather\s+([A-Za-z\s,]+?)(?:\s|$|[?.!])",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid location regex"))
    .collect()
});

/// Words a location capture is never allowed to be.
static LOCATION_BLACKLIST: &[&str] = &["today", "tomorrow", "now", "there", "here"];

/// Search-term phrases: "about <terms>", "on <terms>", "regarding <terms>",
/// "news <terms>".
static SEARCH_TERM_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)about\s+(.+?)(?:\s|$)",
        r"(?i)on\s+(.+?)(?:\s|$)",
        r"(?i)regarding\s+(.+?)(?:\s|$)",
        r"(?i)news\s+(.+?)(?:\s|$)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid search term regex"))
    .collect()
});

/// Filler words stripped from extracted search terms.
static FILLER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(news|latest|today|yesterday)\b").unwrap());

/// Literal clock times: H:MM with an optional am/pm suffix.
static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,2}:\d{2}\s*(?:am|pm)?").unwrap());

/// Words that mark a weather query as asking about the future.
static FORECAST_WORDS: &[&str] = &["tomorrow", "today", "forecast", "week"];

/// Words that mark a calendar query as a create request.
static CREATE_WORDS: &[&str] = &["schedule", "create", "add", "book"];

/// Words that mark a calendar query as a list request.
static LIST_WORDS: &[&str] = &["list", "show", "what's", "upcoming"];

// =============================================================================
// Extraction
// =============================================================================

/// Extract intent-specific entities from an utterance.
///
/// The conversation supplies user preferences (a preferred location backs
/// up weather queries that name none). Intents without entity patterns
/// yield [`Entities::None`].
pub fn extract(utterance: &str, kind: IntentKind, conversation: &Conversation) -> Entities {
    match kind {
        IntentKind::Weather => extract_weather(utterance, conversation),
        IntentKind::News => extract_news(utterance),
        IntentKind::Calendar => extract_calendar(utterance),
        _ => Entities::None,
    }
}

fn extract_weather(utterance: &str, conversation: &Conversation) -> Entities {
    let lower = utterance.to_lowercase();

    let location = extract_location(utterance)
        .or_else(|| conversation.preferences.location.clone());

    let time_reference = if FORECAST_WORDS.iter().any(|w| lower.contains(w)) {
        TimeReference::Forecast
    } else {
        TimeReference::Current
    };

    Entities::Weather {
        location,
        time_reference,
    }
}

/// First non-blacklisted location capture, trying patterns in order.
fn extract_location(utterance: &str) -> Option<String> {
    for pattern in LOCATION_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(utterance) {
            let location = caps.get(1)?.as_str().trim();
            if !LOCATION_BLACKLIST.contains(&location.to_lowercase().as_str()) {
                return Some(location.to_string());
            }
        }
    }
    None
}

fn extract_news(utterance: &str) -> Entities {
    Entities::News {
        category: keywords::detect_news_category(utterance),
        search_terms: extract_search_terms(utterance),
    }
}

/// First search-term capture that survives filler-word stripping.
fn extract_search_terms(utterance: &str) -> Option<String> {
    for pattern in SEARCH_TERM_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(utterance) {
            let raw = caps.get(1)?.as_str();
            let terms = FILLER_RE.replace_all(raw, "");
            let terms = terms.trim();
            if !terms.is_empty() {
                return Some(terms.to_string());
            }
        }
    }
    None
}

fn extract_calendar(utterance: &str) -> Entities {
    let lower = utterance.to_lowercase();

    // Create wins over list; list doubles as the default when no action
    // keyword is present.
    let action = if CREATE_WORDS.iter().any(|w| lower.contains(w)) {
        CalendarAction::Create
    } else if LIST_WORDS.iter().any(|w| lower.contains(w)) {
        CalendarAction::List
    } else {
        CalendarAction::List
    };

    // First match in priority order.
    let date_reference = if lower.contains("today") {
        Some(DateReference::Today)
    } else if lower.contains("tomorrow") {
        Some(DateReference::Tomorrow)
    } else if lower.contains("next week") {
        Some(DateReference::NextWeek)
    } else if lower.contains("this week") {
        Some(DateReference::ThisWeek)
    } else {
        None
    };

    let time = TIME_RE
        .find(&lower)
        .map(|m| m.as_str().trim_end().to_string());

    Entities::Calendar {
        action,
        date_reference,
        time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use valet_core::UserPreferences;
    use valet_providers::NewsCategory;

    fn conversation() -> Conversation {
        Conversation::new(UserPreferences::default())
    }

    fn conversation_in(location: &str) -> Conversation {
        Conversation::new(UserPreferences {
            location: Some(location.to_string()),
            ..UserPreferences::default()
        })
    }

    // ---- Weather ----

    #[test]
    fn test_weather_location_and_forecast() {
        let entities = extract(
            "What's the weather in Paris tomorrow?",
            IntentKind::Weather,
            &conversation(),
        );
        assert_eq!(
            entities,
            Entities::Weather {
                location: Some("Paris".to_string()),
                time_reference: TimeReference::Forecast,
            }
        );
    }

    #[test]
    fn test_weather_current_when_no_time_word() {
        let entities = extract("weather in London?", IntentKind::Weather, &conversation());
        assert_eq!(
            entities,
            Entities::Weather {
                location: Some("London".to_string()),
                time_reference: TimeReference::Current,
            }
        );
    }

    #[test]
    fn test_weather_location_blacklist() {
        // "for tomorrow" captures a blacklisted word; no other pattern
        // matches, so location is absent.
        let entities = extract("forecast for tomorrow", IntentKind::Weather, &conversation());
        assert_eq!(
            entities,
            Entities::Weather {
                location: None,
                time_reference: TimeReference::Forecast,
            }
        );
    }

    #[test]
    fn test_weather_location_falls_back_to_preferences() {
        let entities = extract(
            "how warm is it?",
            IntentKind::Weather,
            &conversation_in("Berlin"),
        );
        assert_eq!(
            entities,
            Entities::Weather {
                location: Some("Berlin".to_string()),
                time_reference: TimeReference::Current,
            }
        );
    }

    #[test]
    fn test_weather_utterance_location_beats_preferences() {
        let entities = extract(
            "weather in Oslo",
            IntentKind::Weather,
            &conversation_in("Berlin"),
        );
        assert_eq!(
            entities,
            Entities::Weather {
                location: Some("Oslo".to_string()),
                time_reference: TimeReference::Current,
            }
        );
    }

    #[test]
    fn test_weather_pattern_order_in_wins() {
        let entities = extract(
            "weather for Madrid in Spain",
            IntentKind::Weather,
            &conversation(),
        );
        // The "in" pattern is tried first.
        assert_eq!(
            entities,
            Entities::Weather {
                location: Some("Spain".to_string()),
                time_reference: TimeReference::Current,
            }
        );
    }

    // ---- News ----

    #[test]
    fn test_news_category_technology() {
        let entities = extract("Show me technology news", IntentKind::News, &conversation());
        match entities {
            Entities::News { category, .. } => {
                assert_eq!(category, Some(NewsCategory::Technology));
            }
            other => panic!("expected news entities, got {:?}", other),
        }
    }

    #[test]
    fn test_news_search_terms_after_about() {
        let entities = extract("news about rust", IntentKind::News, &conversation());
        match entities {
            Entities::News { search_terms, .. } => {
                assert_eq!(search_terms.as_deref(), Some("rust"));
            }
            other => panic!("expected news entities, got {:?}", other),
        }
    }

    #[test]
    fn test_news_search_terms_strip_fillers() {
        // "latest" is a filler word; after stripping nothing is left from
        // the "about" capture, so the next patterns get their chance.
        let entities = extract("tell me about latest", IntentKind::News, &conversation());
        match entities {
            Entities::News { search_terms, .. } => assert!(search_terms.is_none()),
            other => panic!("expected news entities, got {:?}", other),
        }
    }

    #[test]
    fn test_news_no_terms() {
        let entities = extract("headlines please", IntentKind::News, &conversation());
        assert_eq!(
            entities,
            Entities::News {
                category: None,
                search_terms: None,
            }
        );
    }

    // ---- Calendar ----

    #[test]
    fn test_calendar_create_with_date() {
        let entities = extract("Schedule a meeting tomorrow", IntentKind::Calendar, &conversation());
        assert_eq!(
            entities,
            Entities::Calendar {
                action: CalendarAction::Create,
                date_reference: Some(DateReference::Tomorrow),
                time: None,
            }
        );
    }

    #[test]
    fn test_calendar_list_default() {
        let entities = extract("my agenda", IntentKind::Calendar, &conversation());
        assert_eq!(
            entities,
            Entities::Calendar {
                action: CalendarAction::List,
                date_reference: None,
                time: None,
            }
        );
    }

    #[test]
    fn test_calendar_list_explicit() {
        let entities = extract(
            "show upcoming events",
            IntentKind::Calendar,
            &conversation(),
        );
        assert_eq!(
            entities,
            Entities::Calendar {
                action: CalendarAction::List,
                date_reference: None,
                time: None,
            }
        );
    }

    #[test]
    fn test_calendar_date_priority_today_first() {
        // "today" outranks "tomorrow" in the priority chain.
        let entities = extract(
            "what's on today and tomorrow",
            IntentKind::Calendar,
            &conversation(),
        );
        match entities {
            Entities::Calendar { date_reference, .. } => {
                assert_eq!(date_reference, Some(DateReference::Today));
            }
            other => panic!("expected calendar entities, got {:?}", other),
        }
    }

    #[test]
    fn test_calendar_time_with_suffix() {
        let entities = extract(
            "book a meeting at 2:30 pm",
            IntentKind::Calendar,
            &conversation(),
        );
        match entities {
            Entities::Calendar { action, time, .. } => {
                assert_eq!(action, CalendarAction::Create);
                assert_eq!(time.as_deref(), Some("2:30 pm"));
            }
            other => panic!("expected calendar entities, got {:?}", other),
        }
    }

    #[test]
    fn test_calendar_time_24h() {
        let entities = extract("meeting at 14:30", IntentKind::Calendar, &conversation());
        match entities {
            Entities::Calendar { time, .. } => assert_eq!(time.as_deref(), Some("14:30")),
            other => panic!("expected calendar entities, got {:?}", other),
        }
    }

    #[test]
    fn test_calendar_next_week() {
        let entities = extract(
            "plan a review next week",
            IntentKind::Calendar,
            &conversation(),
        );
        match entities {
            Entities::Calendar { date_reference, .. } => {
                assert_eq!(date_reference, Some(DateReference::NextWeek));
            }
            other => panic!("expected calendar entities, got {:?}", other),
        }
    }

    // ---- Other intents ----

    #[test]
    fn test_non_entity_intents_are_none() {
        for kind in [
            IntentKind::Greeting,
            IntentKind::Goodbye,
            IntentKind::Help,
            IntentKind::Thanks,
            IntentKind::General,
        ] {
            assert_eq!(extract("hello there", kind, &conversation()), Entities::None);
        }
    }

    #[test]
    fn test_never_panics_on_odd_input() {
        for utterance in ["", "🌧️", "in ", "about ", ":::", "1:2"] {
            for kind in [IntentKind::Weather, IntentKind::News, IntentKind::Calendar] {
                let _ = extract(utterance, kind, &conversation());
            }
        }
    }
}
