//! Result types returned by the domain providers.
//!
//! These are the structured values the conversation core receives from a
//! collaborator and hands back to the collaborator's formatter.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use valet_core::Units;

// =============================================================================
// Enums
// =============================================================================

/// News categories supported by the headlines endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewsCategory {
    Business,
    Entertainment,
    Health,
    Science,
    Sports,
    Technology,
}

impl NewsCategory {
    /// All categories, in the order category detection checks them.
    pub const ALL: [NewsCategory; 6] = [
        NewsCategory::Business,
        NewsCategory::Entertainment,
        NewsCategory::Health,
        NewsCategory::Science,
        NewsCategory::Sports,
        NewsCategory::Technology,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NewsCategory::Business => "business",
            NewsCategory::Entertainment => "entertainment",
            NewsCategory::Health => "health",
            NewsCategory::Science => "science",
            NewsCategory::Sports => "sports",
            NewsCategory::Technology => "technology",
        }
    }

    /// Title-case label for display.
    pub fn title(&self) -> &'static str {
        match self {
            NewsCategory::Business => "Business",
            NewsCategory::Entertainment => "Entertainment",
            NewsCategory::Health => "Health",
            NewsCategory::Science => "Science",
            NewsCategory::Sports => "Sports",
            NewsCategory::Technology => "Technology",
        }
    }
}

impl fmt::Display for NewsCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NewsCategory {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "business" => Ok(NewsCategory::Business),
            "entertainment" => Ok(NewsCategory::Entertainment),
            "health" => Ok(NewsCategory::Health),
            "science" => Ok(NewsCategory::Science),
            "sports" => Ok(NewsCategory::Sports),
            "technology" => Ok(NewsCategory::Technology),
            _ => Err(format!("Unknown news category: {}", s)),
        }
    }
}

/// Calendar operations a provider can report on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarAction {
    List,
    Create,
    Update,
    Delete,
}

impl fmt::Display for CalendarAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarAction::List => write!(f, "list"),
            CalendarAction::Create => write!(f, "create"),
            CalendarAction::Update => write!(f, "update"),
            CalendarAction::Delete => write!(f, "delete"),
        }
    }
}

impl std::str::FromStr for CalendarAction {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "list" => Ok(CalendarAction::List),
            "create" => Ok(CalendarAction::Create),
            "update" => Ok(CalendarAction::Update),
            "delete" => Ok(CalendarAction::Delete),
            _ => Err(format!("Unknown calendar action: {}", s)),
        }
    }
}

// =============================================================================
// Weather
// =============================================================================

/// One day of an aggregated forecast.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub temp_min: f64,
    pub temp_max: f64,
    pub description: String,
}

/// Weather conditions for a location, optionally with a multi-day forecast.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherInfo {
    pub location: String,
    pub current_temp: f64,
    pub feels_like: f64,
    pub humidity: u32,
    pub description: String,
    pub icon: String,
    #[serde(default)]
    pub forecast: Vec<ForecastDay>,
    pub units: Units,
}

// =============================================================================
// News
// =============================================================================

/// A single news article.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub source: String,
    pub published_at: String,
}

/// A set of news articles from a headlines or search query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewsInfo {
    pub articles: Vec<Article>,
    pub total_results: u32,
    /// Absent means the general/uncategorized feed.
    pub category: Option<NewsCategory>,
    pub sources: Vec<String>,
}

// =============================================================================
// Calendar
// =============================================================================

/// A single calendar event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    pub location: Option<String>,
    pub description: Option<String>,
}

/// Result of a calendar operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalendarInfo {
    pub events: Vec<CalendarEvent>,
    pub action: CalendarAction,
}
