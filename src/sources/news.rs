//! News-search provider (NewsAPI-compatible)

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::{ContentSource, RawItem, SourceError, SourceKind, SourceResult, MAX_TOPICS_PER_CALL};
use crate::config::NewsConfig;
use crate::error::{Error, Result};

const PROVIDER: &str = "NewsAPI";

/// Country names matched as case-insensitive substrings of a place, first hit wins
const COUNTRY_CODES: &[(&str, &str)] = &[
    ("USA", "us"),
    ("United States", "us"),
    ("UK", "gb"),
    ("United Kingdom", "gb"),
    ("Canada", "ca"),
    ("Australia", "au"),
    ("Germany", "de"),
    ("France", "fr"),
    ("Japan", "jp"),
    ("India", "in"),
    ("Italy", "it"),
    ("Spain", "es"),
    ("Netherlands", "nl"),
    ("Brazil", "br"),
    ("Mexico", "mx"),
];

const DEFAULT_COUNTRY: &str = "us";

/// Two-letter headline country for a free-text place
pub fn country_code(place: &str) -> &'static str {
    let place = place.to_lowercase();
    COUNTRY_CODES
        .iter()
        .find(|(name, _)| place.contains(&name.to_lowercase()))
        .map(|(_, code)| *code)
        .unwrap_or(DEFAULT_COUNTRY)
}

#[derive(Debug, Deserialize)]
struct ArticlesResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Article {
    source: Option<ArticleSource>,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArticleSource {
    name: Option<String>,
}

impl Article {
    fn into_raw(self) -> Option<RawItem> {
        let title = self.title.filter(|t| !t.trim().is_empty())?;
        Some(RawItem {
            title,
            provider_label: self.source.and_then(|s| s.name),
            url: self.url,
            description: self.description,
            published_at: self.published_at,
            popularity_score: None,
        })
    }
}

/// News-search HTTP client
pub struct NewsClient {
    client: Client,
    config: NewsConfig,
}

impl NewsClient {
    pub fn new(config: &NewsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|source| Error::HttpClient {
                provider: PROVIDER,
                source,
            })?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn api_key(&self) -> std::result::Result<&str, SourceError> {
        self.config
            .api_key
            .as_deref()
            .ok_or(SourceError::NotConfigured { provider: PROVIDER })
    }

    async fn get_articles(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        limit: usize,
    ) -> SourceResult {
        let key = self.api_key()?;
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), endpoint);
        let to_source_err =
            |e: reqwest::Error| SourceError::from_reqwest(PROVIDER, e, self.config.timeout);

        let response = self
            .client
            .get(&url)
            .header("X-Api-Key", key)
            .query(params)
            .send()
            .await
            .map_err(to_source_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
            });
        }

        let body: ArticlesResponse = response.json().await.map_err(to_source_err)?;
        let items: Vec<RawItem> = body
            .articles
            .into_iter()
            .filter_map(Article::into_raw)
            .take(limit)
            .collect();

        debug!("{} /{} returned {} articles", PROVIDER, endpoint, items.len());
        Ok(items)
    }

    async fn top_headlines(&self, country: &str, limit: usize) -> SourceResult {
        let params = [
            ("country", country.to_string()),
            ("pageSize", limit.to_string()),
        ];
        self.get_articles("top-headlines", &params, limit).await
    }

    /// Lower date bound for interest searches, `None` when the lookback
    /// window is out of chrono's range
    fn search_from(&self) -> Option<String> {
        ChronoDuration::try_days(self.config.lookback_days)
            .and_then(|window| Utc::now().checked_sub_signed(window))
            .map(|from| from.format("%Y-%m-%d").to_string())
    }
}

#[async_trait]
impl ContentSource for NewsClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn kind(&self) -> SourceKind {
        SourceKind::News
    }

    #[instrument(skip(self), fields(provider = PROVIDER))]
    async fn fetch_by_interest(&self, topics: &[String], limit: usize) -> SourceResult {
        self.api_key()?;

        let from = self.search_from();
        if from.is_none() {
            warn!(
                "{} lookback of {} days is out of range, searching without a date bound",
                PROVIDER, self.config.lookback_days
            );
        }

        let mut collected = Vec::new();
        let mut last_error = None;

        for topic in topics.iter().take(MAX_TOPICS_PER_CALL) {
            let mut params = vec![
                ("q", topic.clone()),
                ("sortBy", "relevancy".to_string()),
                ("pageSize", limit.to_string()),
                ("language", self.config.language.clone()),
            ];
            if let Some(from) = &from {
                params.push(("from", from.clone()));
            }
            match self.get_articles("everything", &params, limit).await {
                Ok(items) => collected.extend(items),
                Err(e @ SourceError::NotConfigured { .. }) => return Err(e),
                Err(e) => {
                    warn!("{} search for '{}' failed: {}", PROVIDER, topic, e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if collected.is_empty() => Err(e),
            _ => Ok(collected),
        }
    }

    #[instrument(skip(self), fields(provider = PROVIDER))]
    async fn fetch_by_location(&self, place: &str, limit: usize) -> SourceResult {
        self.top_headlines(country_code(place), limit).await
    }

    #[instrument(skip(self), fields(provider = PROVIDER))]
    async fn fetch_trending(&self, limit: usize) -> SourceResult {
        self.top_headlines(DEFAULT_COUNTRY, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_code_lookup() {
        assert_eq!(country_code("London, UK"), "gb");
        assert_eq!(country_code("toronto, canada"), "ca");
        assert_eq!(country_code("San Francisco, USA"), "us");
        assert_eq!(country_code("Not specified"), "us");
        assert_eq!(country_code("Tokyo, Japan"), "jp");
    }

    #[test]
    fn test_article_without_title_dropped() {
        let article = Article {
            source: None,
            title: Some("  ".into()),
            description: None,
            url: None,
            published_at: None,
        };
        assert!(article.into_raw().is_none());
    }

    #[test]
    fn test_article_maps_source_name() {
        let body: ArticlesResponse = serde_json::from_str(
            r#"{"status":"ok","articles":[{"source":{"id":null,"name":"BBC News"},
                "title":"Rust 2.0","description":"d","url":"https://bbc.co.uk/x",
                "publishedAt":"2026-10-01T10:00:00Z"}]}"#,
        )
        .unwrap();
        let raw = body
            .articles
            .into_iter()
            .next()
            .and_then(Article::into_raw)
            .unwrap();
        assert_eq!(raw.provider_label.as_deref(), Some("BBC News"));
        assert_eq!(raw.published_at.as_deref(), Some("2026-10-01T10:00:00Z"));
    }

    #[test]
    fn test_search_from_out_of_range_lookback() {
        let client = NewsClient::new(&NewsConfig {
            lookback_days: 1_000_000_000,
            ..Default::default()
        })
        .unwrap();
        assert!(client.search_from().is_none());

        let client = NewsClient::new(&NewsConfig::default()).unwrap();
        let expected = (Utc::now() - ChronoDuration::days(7)).format("%Y-%m-%d").to_string();
        assert_eq!(client.search_from(), Some(expected));
    }

    #[tokio::test]
    async fn test_huge_lookback_without_key_is_not_configured() {
        let client = NewsClient::new(&NewsConfig {
            lookback_days: 1_000_000_000,
            ..Default::default()
        })
        .unwrap();
        let err = client
            .fetch_by_interest(&["rust".into()], 3)
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::NotConfigured { .. }));
    }

    #[tokio::test]
    async fn test_missing_key_short_circuits() {
        let client = NewsClient::new(&NewsConfig::default()).unwrap();
        let err = client.fetch_trending(3).await.unwrap_err();
        assert!(matches!(err, SourceError::NotConfigured { .. }));
    }
}
