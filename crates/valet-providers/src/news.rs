//! NewsAPI-backed news provider.
//!
//! Headlines come from the `top-headlines` endpoint, searches from
//! `everything`. Parsing is a pure function over `serde_json::Value`,
//! tested on fixtures.

use async_trait::async_trait;
use serde_json::Value;
use valet_core::config::NewsConfig;

use crate::error::ProviderError;
use crate::types::{Article, NewsCategory, NewsInfo};
use crate::NewsProvider;

/// News provider backed by the NewsAPI REST service.
pub struct NewsApiProvider {
    client: reqwest::Client,
    config: NewsConfig,
}

impl NewsApiProvider {
    pub fn new(config: NewsConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn fetch(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value, ProviderError> {
        if self.config.api_key.is_empty() {
            return Err(ProviderError::NotConfigured(
                "news API key is not set".to_string(),
            ));
        }

        let url = format!("{}/{}", self.config.base_url, endpoint);
        let page_size = self.config.page_size.min(100).to_string();
        tracing::debug!(endpoint, "Fetching news data");
        let response = self
            .client
            .get(&url)
            .query(&[
                ("apiKey", self.config.api_key.as_str()),
                ("pageSize", page_size.as_str()),
            ])
            .query(params)
            .send()
            .await?;
        let body: Value = response.json().await?;

        if body.get("status").and_then(Value::as_str) != Some("ok") {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            return Err(ProviderError::Unavailable(format!(
                "news API error: {}",
                message
            )));
        }

        Ok(body)
    }
}

#[async_trait]
impl NewsProvider for NewsApiProvider {
    async fn headlines(&self, category: Option<NewsCategory>) -> Result<NewsInfo, ProviderError> {
        let mut params = vec![("country", self.config.country.clone())];
        if let Some(cat) = category {
            params.push(("category", cat.to_string()));
        }
        let body = self.fetch("top-headlines", &params).await?;
        Ok(parse_news(&body, category))
    }

    async fn search(&self, terms: &str) -> Result<NewsInfo, ProviderError> {
        let params = vec![
            ("q", terms.to_string()),
            ("sortBy", "publishedAt".to_string()),
        ];
        let body = self.fetch("everything", &params).await?;
        Ok(parse_news(&body, None))
    }
}

/// Parse a NewsAPI response body into a `NewsInfo`.
pub fn parse_news(body: &Value, category: Option<NewsCategory>) -> NewsInfo {
    let raw_articles = body
        .get("articles")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let mut sources: Vec<String> = Vec::new();
    let articles: Vec<Article> = raw_articles
        .iter()
        .map(|a| {
            let source = a
                .get("source")
                .and_then(|s| s.get("name"))
                .and_then(Value::as_str)
                .unwrap_or("Unknown")
                .to_string();
            if !sources.contains(&source) {
                sources.push(source.clone());
            }
            Article {
                title: a
                    .get("title")
                    .and_then(Value::as_str)
                    .unwrap_or("Untitled")
                    .to_string(),
                description: a
                    .get("description")
                    .and_then(Value::as_str)
                    .filter(|d| !d.is_empty())
                    .map(str::to_string),
                url: a.get("url").and_then(Value::as_str).unwrap_or("").to_string(),
                source,
                published_at: a
                    .get("publishedAt")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string(),
            }
        })
        .collect();

    let total_results = body
        .get("totalResults")
        .and_then(Value::as_u64)
        .unwrap_or(articles.len() as u64) as u32;

    NewsInfo {
        articles,
        total_results,
        category,
        sources,
    }
}
