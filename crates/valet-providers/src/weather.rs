//! OpenWeatherMap-backed weather provider.
//!
//! Fetches current conditions and the 3-hourly forecast endpoint, then
//! aggregates forecast entries into daily min/max summaries. Parsing is
//! kept in pure functions over `serde_json::Value` so it can be tested on
//! fixtures without a network.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use serde_json::Value;
use valet_core::config::WeatherConfig;
use valet_core::Units;

use crate::error::ProviderError;
use crate::types::{ForecastDay, WeatherInfo};
use crate::WeatherProvider;

/// Days of forecast to request; the API returns 3-hour intervals, 8 per day.
const FORECAST_DAYS: usize = 5;

/// Weather provider backed by the OpenWeatherMap REST API.
pub struct OpenWeatherProvider {
    client: reqwest::Client,
    config: WeatherConfig,
}

impl OpenWeatherProvider {
    pub fn new(config: WeatherConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn fetch(&self, endpoint: &str, location: &str, count: Option<usize>) -> Result<Value, ProviderError> {
        if self.config.api_key.is_empty() {
            return Err(ProviderError::NotConfigured(
                "weather API key is not set".to_string(),
            ));
        }

        let url = format!("{}/{}", self.config.base_url, endpoint);
        let mut request = self.client.get(&url).query(&[
            ("q", location),
            ("appid", self.config.api_key.as_str()),
            ("units", self.config.units.as_str()),
        ]);
        if let Some(cnt) = count {
            request = request.query(&[("cnt", cnt.to_string())]);
        }

        tracing::debug!(endpoint, location, "Fetching weather data");
        let response = request.send().await?;
        let status = response.status();
        let body: Value = response.json().await?;

        // The API reports errors in-band via "cod"/"message" alongside the
        // HTTP status.
        if !status.is_success() {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            return Err(ProviderError::Unavailable(format!(
                "weather API error: {}",
                message
            )));
        }

        Ok(body)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, location: &str) -> Result<WeatherInfo, ProviderError> {
        let body = self.fetch("weather", location, None).await?;
        parse_current(&body, location, self.config.units)
    }

    async fn forecast(&self, location: &str) -> Result<WeatherInfo, ProviderError> {
        let body = self
            .fetch("forecast", location, Some(FORECAST_DAYS * 8))
            .await?;
        parse_forecast(&body, location, self.config.units)
    }
}

/// Parse a current-conditions response into a `WeatherInfo`.
pub fn parse_current(body: &Value, location: &str, units: Units) -> Result<WeatherInfo, ProviderError> {
    let main = body
        .get("main")
        .ok_or_else(|| ProviderError::InvalidResponse("missing \"main\" block".to_string()))?;
    let weather = body
        .get("weather")
        .and_then(|w| w.get(0))
        .cloned()
        .unwrap_or(Value::Null);

    Ok(WeatherInfo {
        location: body
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(location)
            .to_string(),
        current_temp: main.get("temp").and_then(Value::as_f64).unwrap_or(0.0),
        feels_like: main.get("feels_like").and_then(Value::as_f64).unwrap_or(0.0),
        humidity: main.get("humidity").and_then(Value::as_u64).unwrap_or(0) as u32,
        description: title_case(
            weather
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or(""),
        ),
        icon: weather
            .get("icon")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string(),
        forecast: vec![],
        units,
    })
}

/// Parse a 3-hourly forecast response into a `WeatherInfo` with daily
/// summaries. The first interval doubles as the "current" conditions.
pub fn parse_forecast(body: &Value, location: &str, units: Units) -> Result<WeatherInfo, ProviderError> {
    let entries = body
        .get("list")
        .and_then(Value::as_array)
        .ok_or_else(|| ProviderError::InvalidResponse("missing \"list\" block".to_string()))?;

    fn flush(days: &mut Vec<ForecastDay>, day: Option<NaiveDate>, temps: &[f64], description: &str) {
        if let (Some(date), false) = (day, temps.is_empty()) {
            days.push(ForecastDay {
                date,
                temp_min: temps.iter().cloned().fold(f64::INFINITY, f64::min),
                temp_max: temps.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
                description: description.to_string(),
            });
        }
    }

    let mut days: Vec<ForecastDay> = Vec::new();
    let mut current_day: Option<NaiveDate> = None;
    let mut temps: Vec<f64> = Vec::new();
    let mut day_description = String::new();

    for entry in entries.iter().take(FORECAST_DAYS * 8) {
        let Some(epoch) = entry.get("dt").and_then(Value::as_i64) else {
            continue;
        };
        let Some(dt) = DateTime::from_timestamp(epoch, 0) else {
            continue;
        };
        let day = dt.date_naive();

        if current_day != Some(day) {
            flush(&mut days, current_day, &temps, &day_description);
            current_day = Some(day);
            temps.clear();
            day_description = title_case(
                entry
                    .get("weather")
                    .and_then(|w| w.get(0))
                    .and_then(|w| w.get("description"))
                    .and_then(Value::as_str)
                    .unwrap_or(""),
            );
        }

        if let Some(temp) = entry.get("main").and_then(|m| m.get("temp")).and_then(Value::as_f64) {
            temps.push(temp);
        }
    }
    flush(&mut days, current_day, &temps, &day_description);

    let current = entries.first().cloned().unwrap_or(Value::Null);
    let main = current.get("main").cloned().unwrap_or(Value::Null);
    let weather = current
        .get("weather")
        .and_then(|w| w.get(0))
        .cloned()
        .unwrap_or(Value::Null);

    Ok(WeatherInfo {
        location: body
            .get("city")
            .and_then(|c| c.get("name"))
            .and_then(Value::as_str)
            .unwrap_or(location)
            .to_string(),
        current_temp: main.get("temp").and_then(Value::as_f64).unwrap_or(0.0),
        feels_like: main.get("feels_like").and_then(Value::as_f64).unwrap_or(0.0),
        humidity: main.get("humidity").and_then(Value::as_u64).unwrap_or(0) as u32,
        description: title_case(
            weather
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or(""),
        ),
        icon: weather
            .get("icon")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string(),
        forecast: days,
        units,
    })
}

/// Uppercase the first letter of each word ("scattered clouds" -> "Scattered Clouds").
fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
