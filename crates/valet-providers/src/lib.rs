//! Domain providers for the Valet assistant.
//!
//! Defines the collaborator contracts the conversation core depends on
//! (weather, news, calendar), their result types and formatters, the
//! HTTP-backed implementations, and mock providers for tests.
//!
//! Each provider exposes three things to the core: its async operations,
//! the intent keyword list that routes utterances to it, and a formatter
//! that turns its result type into opaque display text.

use async_trait::async_trait;

pub mod calendar;
pub mod error;
pub mod format;
pub mod keywords;
pub mod mock;
pub mod news;
pub mod types;
pub mod weather;

pub use calendar::LocalCalendarProvider;
pub use error::ProviderError;
pub use mock::{MockCalendarProvider, MockNewsProvider, MockWeatherProvider};
pub use news::NewsApiProvider;
pub use types::{
    Article, CalendarAction, CalendarEvent, CalendarInfo, ForecastDay, NewsCategory, NewsInfo,
    WeatherInfo,
};
pub use weather::OpenWeatherProvider;

/// Weather data collaborator.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Current conditions for a location.
    async fn current_weather(&self, location: &str) -> Result<WeatherInfo, ProviderError>;

    /// Multi-day forecast for a location.
    async fn forecast(&self, location: &str) -> Result<WeatherInfo, ProviderError>;

    /// Keywords that mark an utterance as weather-related.
    fn intent_keywords(&self) -> &'static [&'static str] {
        keywords::WEATHER
    }

    /// Render a result as display text.
    fn format(&self, info: &WeatherInfo) -> String {
        format::weather_message(info)
    }
}

/// News data collaborator.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    /// Top headlines, optionally restricted to a category.
    async fn headlines(&self, category: Option<NewsCategory>) -> Result<NewsInfo, ProviderError>;

    /// Full-text article search.
    async fn search(&self, terms: &str) -> Result<NewsInfo, ProviderError>;

    /// Keywords that mark an utterance as news-related.
    fn intent_keywords(&self) -> &'static [&'static str] {
        keywords::NEWS
    }

    /// Detect a news category from a free-text query.
    fn detect_category(&self, query: &str) -> Option<NewsCategory> {
        keywords::detect_news_category(query)
    }

    /// Render a result as display text.
    fn format(&self, info: &NewsInfo) -> String {
        format::news_message(info)
    }
}

/// Calendar collaborator.
///
/// Create and delete exist on the contract but are not reachable through
/// the conversation core's dispatch table; the core only lists events.
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Upcoming events.
    async fn list_events(&self) -> Result<CalendarInfo, ProviderError>;

    /// Add an event.
    async fn create_event(&self, event: CalendarEvent) -> Result<CalendarInfo, ProviderError>;

    /// Remove an event by id.
    async fn delete_event(&self, event_id: &str) -> Result<CalendarInfo, ProviderError>;

    /// Keywords that mark an utterance as calendar-related.
    fn intent_keywords(&self) -> &'static [&'static str] {
        keywords::CALENDAR
    }

    /// Render a result as display text.
    fn format(&self, info: &CalendarInfo) -> String {
        format::calendar_message(info)
    }
}
