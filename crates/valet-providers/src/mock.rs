//! Mock providers for tests.
//!
//! Each mock is built either succeeding with a fixture result or failing
//! with a fixed error message, and counts how many calls it received so
//! tests can assert a collaborator was (or was not) invoked.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use valet_core::Units;

use crate::error::ProviderError;
use crate::types::{
    Article, CalendarAction, CalendarEvent, CalendarInfo, NewsCategory, NewsInfo, WeatherInfo,
};
use crate::{CalendarProvider, NewsProvider, WeatherProvider};

fn mock_error(message: &str) -> ProviderError {
    ProviderError::Unavailable(message.to_string())
}

// =============================================================================
// Weather
// =============================================================================

/// Weather provider returning a canned result or error.
pub struct MockWeatherProvider {
    info: WeatherInfo,
    error: Option<String>,
    calls: AtomicUsize,
}

impl MockWeatherProvider {
    /// A mock that succeeds with a small Paris fixture.
    pub fn succeeding() -> Self {
        Self {
            info: WeatherInfo {
                location: "Paris".to_string(),
                current_temp: 18.5,
                feels_like: 17.0,
                humidity: 60,
                description: "Clear Sky".to_string(),
                icon: "01d".to_string(),
                forecast: vec![],
                units: Units::Metric,
            },
            error: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// A mock whose calls all fail with the given message.
    pub fn failing(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Self::succeeding()
        }
    }

    /// Number of operation calls received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn respond(&self) -> Result<WeatherInfo, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.error {
            Some(message) => Err(mock_error(message)),
            None => Ok(self.info.clone()),
        }
    }
}

#[async_trait]
impl WeatherProvider for MockWeatherProvider {
    async fn current_weather(&self, _location: &str) -> Result<WeatherInfo, ProviderError> {
        self.respond()
    }

    async fn forecast(&self, _location: &str) -> Result<WeatherInfo, ProviderError> {
        self.respond()
    }
}

// =============================================================================
// News
// =============================================================================

/// News provider returning a canned result or error.
pub struct MockNewsProvider {
    error: Option<String>,
    calls: AtomicUsize,
}

impl MockNewsProvider {
    pub fn succeeding() -> Self {
        Self {
            error: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn respond(&self, category: Option<NewsCategory>) -> Result<NewsInfo, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.error {
            Some(message) => Err(mock_error(message)),
            None => Ok(NewsInfo {
                articles: vec![Article {
                    title: "Mock headline".to_string(),
                    description: Some("Mock description.".to_string()),
                    url: "https://example.com/mock".to_string(),
                    source: "Mock Wire".to_string(),
                    published_at: "2024-03-04T09:00:00Z".to_string(),
                }],
                total_results: 1,
                category,
                sources: vec!["Mock Wire".to_string()],
            }),
        }
    }
}

#[async_trait]
impl NewsProvider for MockNewsProvider {
    async fn headlines(&self, category: Option<NewsCategory>) -> Result<NewsInfo, ProviderError> {
        self.respond(category)
    }

    async fn search(&self, _terms: &str) -> Result<NewsInfo, ProviderError> {
        self.respond(None)
    }
}

// =============================================================================
// Calendar
// =============================================================================

/// Calendar provider returning a canned result or error.
pub struct MockCalendarProvider {
    error: Option<String>,
    calls: AtomicUsize,
}

impl MockCalendarProvider {
    pub fn succeeding() -> Self {
        Self {
            error: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn respond(&self, action: CalendarAction) -> Result<CalendarInfo, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.error {
            Some(message) => Err(mock_error(message)),
            None => Ok(CalendarInfo {
                events: vec![CalendarEvent {
                    id: "mock-1".to_string(),
                    title: "Mock standup".to_string(),
                    start_time: "2024-03-04 09:00".to_string(),
                    end_time: "2024-03-04 09:15".to_string(),
                    location: None,
                    description: None,
                }],
                action,
            }),
        }
    }
}

#[async_trait]
impl CalendarProvider for MockCalendarProvider {
    async fn list_events(&self) -> Result<CalendarInfo, ProviderError> {
        self.respond(CalendarAction::List)
    }

    async fn create_event(&self, _event: CalendarEvent) -> Result<CalendarInfo, ProviderError> {
        self.respond(CalendarAction::Create)
    }

    async fn delete_event(&self, _event_id: &str) -> Result<CalendarInfo, ProviderError> {
        self.respond(CalendarAction::Delete)
    }
}
