use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::types::Units;

/// Top-level configuration for the Valet assistant.
///
/// Loaded from `~/.valet/config.toml` by default. Each section corresponds
/// to a bounded context or cross-cutting concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValetConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub news: NewsConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
}

impl ValetConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ValetConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Conversation engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Maximum number of live conversations before least-recently-updated
    /// eviction kicks in.
    pub max_conversations: usize,
    /// Maximum messages retained per conversation (oldest trimmed).
    pub max_messages: usize,
    /// Default number of messages returned by history queries.
    pub history_limit: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_conversations: 10,
            max_messages: 50,
            history_limit: 20,
        }
    }
}

/// Weather provider settings (OpenWeatherMap).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// API key. Empty means the provider is not configured.
    pub api_key: String,
    /// Base URL for the data API.
    pub base_url: String,
    /// Temperature units for lookups.
    pub units: Units,
    /// Location used when neither the utterance nor the user preferences
    /// name one.
    pub default_location: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.openweathermap.org/data/2.5".to_string(),
            units: Units::Metric,
            default_location: "London".to_string(),
        }
    }
}

/// News provider settings (NewsAPI).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    /// API key. Empty means the provider is not configured.
    pub api_key: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Country code for headline queries (us, gb, fr, ...).
    pub country: String,
    /// Number of articles to request per query (capped at 100 by the API).
    pub page_size: u32,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://newsapi.org/v2".to_string(),
            country: "us".to_string(),
            page_size: 10,
        }
    }
}

/// Calendar provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Maximum number of events returned by a listing.
    pub max_results: usize,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self { max_results: 10 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ValetConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.chat.max_conversations, 10);
        assert_eq!(config.chat.max_messages, 50);
        assert_eq!(config.chat.history_limit, 20);
        assert!(config.weather.api_key.is_empty());
        assert_eq!(config.weather.units, Units::Metric);
        assert_eq!(config.news.country, "us");
        assert_eq!(config.calendar.max_results, 10);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = ValetConfig::load_or_default(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.chat.max_conversations, 10);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = ValetConfig::default();
        config.weather.api_key = "abc123".to_string();
        config.chat.max_conversations = 5;
        config.save(&path).unwrap();

        let loaded = ValetConfig::load(&path).unwrap();
        assert_eq!(loaded.weather.api_key, "abc123");
        assert_eq!(loaded.chat.max_conversations, 5);
        // Untouched sections keep their defaults.
        assert_eq!(loaded.news.page_size, 10);
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[weather]\napi_key = \"k\"\nunits = \"imperial\"\n").unwrap();

        let config = ValetConfig::load(&path).unwrap();
        assert_eq!(config.weather.api_key, "k");
        assert_eq!(config.weather.units, Units::Imperial);
        assert_eq!(config.chat.max_messages, 50);
    }

    #[test]
    fn test_load_invalid_toml_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not [ valid").unwrap();

        assert!(ValetConfig::load(&path).is_err());
        // load_or_default degrades gracefully.
        let config = ValetConfig::load_or_default(&path);
        assert_eq!(config.chat.max_conversations, 10);
    }
}
