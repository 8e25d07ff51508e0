//! Human-readable formatters for provider result types.
//!
//! The conversation core treats these strings as opaque display text; all
//! layout decisions live here.

use crate::types::{CalendarAction, CalendarInfo, NewsCategory, NewsInfo, WeatherInfo};

/// Maximum articles shown in a news message.
const MAX_ARTICLES: usize = 5;
/// Maximum forecast days shown in a weather message.
const MAX_FORECAST_DAYS: usize = 5;

/// Format weather conditions (and forecast, if present) as display text.
pub fn weather_message(info: &WeatherInfo) -> String {
    let sym = info.units.symbol();

    let mut message = format!("🌤️ Weather in {}:\n", info.location);
    message.push_str(&format!(
        "Currently {:.1}{} (feels like {:.1}{})\n",
        info.current_temp, sym, info.feels_like, sym
    ));
    message.push_str(&format!("{}\n", info.description));
    message.push_str(&format!("Humidity: {}%", info.humidity));

    if !info.forecast.is_empty() {
        message.push_str("\n\n📅 Forecast:\n");
        for day in info.forecast.iter().take(MAX_FORECAST_DAYS) {
            message.push_str(&format!(
                "{}: {:.1}-{:.1}{} - {}\n",
                day.date.format("%A, %B %d"),
                day.temp_min,
                day.temp_max,
                sym,
                day.description
            ));
        }
    }

    message.trim().to_string()
}

fn category_emoji(category: Option<NewsCategory>) -> &'static str {
    match category {
        Some(NewsCategory::Business) => "💼",
        Some(NewsCategory::Entertainment) => "🎭",
        Some(NewsCategory::Health) => "🏥",
        Some(NewsCategory::Science) => "🔬",
        Some(NewsCategory::Sports) => "⚽",
        Some(NewsCategory::Technology) => "💻",
        None => "📰",
    }
}

/// Format a set of news articles as display text.
pub fn news_message(info: &NewsInfo) -> String {
    if info.articles.is_empty() {
        return "📰 No news articles found for your query.".to_string();
    }

    let label = info.category.map(|c| c.title()).unwrap_or("General");
    let mut message = format!("{} Latest {} News:\n\n", category_emoji(info.category), label);

    for article in info.articles.iter().take(MAX_ARTICLES) {
        message.push_str(&format!("📄 **{}**\n", article.title));

        if let Some(ref description) = article.description {
            let description = if description.chars().count() > 150 {
                let truncated: String = description.chars().take(150).collect();
                format!("{}...", truncated)
            } else {
                description.clone()
            };
            message.push_str(&format!("   {}\n", description));
        }

        message.push_str(&format!(
            "   📅 {} | 📰 {}\n",
            article.published_at, article.source
        ));
        message.push_str(&format!("   🔗 {}\n\n", article.url));
    }

    if info.articles.len() > MAX_ARTICLES {
        let remaining = info.articles.len() - MAX_ARTICLES;
        message.push_str(&format!("... and {} more articles available.", remaining));
    }

    message.trim().to_string()
}

/// Format a calendar result as display text.
pub fn calendar_message(info: &CalendarInfo) -> String {
    match info.action {
        CalendarAction::List => {
            if info.events.is_empty() {
                return "📅 No upcoming events found in your calendar.".to_string();
            }

            let mut message = String::from("📅 Your Upcoming Events:\n\n");
            for event in &info.events {
                message.push_str(&format!("📝 **{}**\n", event.title));
                message.push_str(&format!("   🕐 {}", event.start_time));
                if event.end_time != event.start_time {
                    message.push_str(&format!(" - {}", event.end_time));
                }
                message.push('\n');

                if let Some(ref location) = event.location {
                    message.push_str(&format!("   📍 {}\n", location));
                }

                if let Some(ref description) = event.description {
                    let desc = if description.chars().count() > 100 {
                        let truncated: String = description.chars().take(100).collect();
                        format!("{}...", truncated)
                    } else {
                        description.clone()
                    };
                    message.push_str(&format!("   📄 {}\n", desc));
                }

                message.push('\n');
            }

            message.trim().to_string()
        }
        CalendarAction::Create => {
            let mut message = String::from("✅ Event created successfully!\n\n");
            if let Some(event) = info.events.first() {
                message.push_str(&format!("📝 **{}**\n", event.title));
                message.push_str(&format!("🕐 {} - {}\n", event.start_time, event.end_time));
                if let Some(ref location) = event.location {
                    message.push_str(&format!("📍 {}\n", location));
                }
            }
            message.trim().to_string()
        }
        CalendarAction::Update => "✅ Event updated successfully!".to_string(),
        CalendarAction::Delete => "✅ Event deleted successfully!".to_string(),
    }
}
