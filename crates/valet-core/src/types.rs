use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical timestamp type used across all Valet crates.
pub type Timestamp = DateTime<Utc>;

/// Temperature units for weather data and preferences.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    /// The display symbol for temperatures in these units.
    pub fn symbol(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }

    /// The query-parameter value expected by weather APIs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Units {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            _ => Err(format!("Unknown units: {}", s)),
        }
    }
}

/// Per-user preferences attached to a conversation at creation time.
///
/// Set once when the conversation is opened and never auto-mutated by the
/// core afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    /// Preferred location for weather lookups when the utterance has none.
    pub location: Option<String>,
    /// Preferred temperature units.
    pub units: Units,
    /// Preferred language code (informational; the core is English-only).
    pub language: String,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            location: None,
            units: Units::Metric,
            language: "en".to_string(),
        }
    }
}
