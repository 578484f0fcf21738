//! Link-aggregator provider (Reddit-compatible public JSON API)
//!
//! Every request is followed by a fixed pause (`AggregatorConfig::request_delay`)
//! to stay under the provider's informal rate limit.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

use super::{ContentSource, RawItem, SourceError, SourceKind, SourceResult, MAX_TOPICS_PER_CALL};
use crate::config::AggregatorConfig;
use crate::error::{Error, Result};

const PROVIDER: &str = "Reddit";
const PERMALINK_BASE: &str = "https://reddit.com";

/// Interest keyword → community name. Unlisted interests use the lower-cased keyword.
static COMMUNITIES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("technology", "technology"),
        ("gaming", "gaming"),
        ("sports", "sports"),
        ("music", "music"),
        ("art", "art"),
        ("science", "science"),
        ("food", "food"),
        ("travel", "travel"),
        ("fitness", "fitness"),
        ("movies", "movies"),
        ("books", "books"),
        ("photography", "photography"),
        ("programming", "programming"),
        ("ai", "MachineLearning"),
        ("fashion", "fashion"),
        ("business", "business"),
        ("finance", "finance"),
        ("cooking", "cooking"),
        ("health", "health"),
        ("psychology", "psychology"),
        ("history", "history"),
        ("politics", "politics"),
        ("environment", "environment"),
        ("space", "space"),
    ])
});

/// Community to browse for an interest keyword
pub fn community_for(interest: &str) -> String {
    let key = interest.trim().to_lowercase();
    COMMUNITIES
        .get(key.as_str())
        .map(|c| c.to_string())
        .unwrap_or(key)
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: Post,
}

#[derive(Debug, Deserialize)]
struct Post {
    #[serde(default)]
    title: String,
    #[serde(default)]
    subreddit: String,
    #[serde(default)]
    permalink: String,
    #[serde(default)]
    score: i64,
    created_utc: Option<f64>,
}

impl Post {
    fn into_raw(self) -> Option<RawItem> {
        if self.title.trim().is_empty() {
            return None;
        }
        let published_at = self
            .created_utc
            .and_then(|secs| Utc.timestamp_opt(secs as i64, 0).single())
            .map(|dt| dt.to_rfc3339());
        let label = if self.subreddit.is_empty() {
            None
        } else {
            Some(format!("r/{}", self.subreddit))
        };

        Some(RawItem {
            title: self.title,
            provider_label: label,
            url: Some(format!("{}{}", PERMALINK_BASE, self.permalink)),
            description: None,
            published_at,
            popularity_score: Some(self.score),
        })
    }
}

/// Link-aggregator HTTP client
pub struct AggregatorClient {
    client: Client,
    config: AggregatorConfig,
}

impl AggregatorClient {
    pub fn new(config: &AggregatorConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
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

    /// GET a listing, then pause for the configured delay regardless of outcome
    async fn get_listing(
        &self,
        path: &str,
        params: &[(&str, String)],
        limit: usize,
    ) -> SourceResult {
        let result = self.request_listing(path, params, limit).await;
        if !self.config.request_delay.is_zero() {
            tokio::time::sleep(self.config.request_delay).await;
        }
        result
    }

    async fn request_listing(
        &self,
        path: &str,
        params: &[(&str, String)],
        limit: usize,
    ) -> SourceResult {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);
        let to_source_err =
            |e: reqwest::Error| SourceError::from_reqwest(PROVIDER, e, self.config.timeout);

        let response = self
            .client
            .get(&url)
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

        let listing: Listing = response.json().await.map_err(to_source_err)?;
        let items: Vec<RawItem> = listing
            .data
            .children
            .into_iter()
            .filter_map(|c| c.data.into_raw())
            .take(limit)
            .collect();

        debug!("{} /{} returned {} posts", PROVIDER, path, items.len());
        Ok(items)
    }
}

#[async_trait]
impl ContentSource for AggregatorClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn kind(&self) -> SourceKind {
        SourceKind::LinkAggregator
    }

    #[instrument(skip(self), fields(provider = PROVIDER))]
    async fn fetch_by_interest(&self, topics: &[String], limit: usize) -> SourceResult {
        let mut collected = Vec::new();
        let mut last_error = None;

        for topic in topics.iter().take(MAX_TOPICS_PER_CALL) {
            let path = format!("r/{}/hot.json", community_for(topic));
            match self
                .get_listing(&path, &[("limit", limit.to_string())], limit)
                .await
            {
                Ok(items) => collected.extend(items),
                Err(e) => {
                    warn!("{} listing for '{}' failed: {}", PROVIDER, topic, e);
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
        let params = [
            ("q", place.to_string()),
            ("sort", "hot".to_string()),
            ("limit", limit.to_string()),
        ];
        self.get_listing("search.json", &params, limit).await
    }

    #[instrument(skip(self), fields(provider = PROVIDER))]
    async fn fetch_trending(&self, limit: usize) -> SourceResult {
        self.get_listing("r/popular/hot.json", &[("limit", limit.to_string())], limit)
            .await
    }
}
