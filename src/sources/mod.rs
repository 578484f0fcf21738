//! Content Sources
//!
//! External providers the feed composer pulls raw items from.
//!
//! ## Contract
//!
//! A [`ContentSource`] answers three kinds of query (interest, location,
//! trending) with either a list of [`RawItem`]s or a typed [`SourceError`].
//! Providers never fabricate stand-in content: substituting placeholders for an
//! unavailable provider is the composer's job (see [`placeholder`]).
//!
//! ## Providers
//!
//! - [`news::NewsClient`] - news-search API (NewsAPI-compatible)
//! - [`aggregator::AggregatorClient`] - link aggregator (Reddit-compatible)

pub mod aggregator;
pub mod news;
pub mod placeholder;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub use aggregator::AggregatorClient;
pub use news::NewsClient;

/// Interest queries hit the network for at most this many topics per call
pub const MAX_TOPICS_PER_CALL: usize = 2;

/// Which family of provider a source belongs to. Drives placeholder shape and
/// per-strategy description wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    News,
    LinkAggregator,
}

/// A provider-neutral content item
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawItem {
    pub title: String,
    /// Provider-specific sub-label, e.g. a publication or `r/<community>`
    pub provider_label: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub published_at: Option<String>,
    /// Upvotes or similar popularity signal
    pub popularity_score: Option<i64>,
}

/// A single request to a content source
#[derive(Debug, Clone, PartialEq)]
pub enum SourceQuery {
    Interest(Vec<String>),
    Location(String),
    Trending,
}

impl SourceQuery {
    /// First non-blank query term, used to personalise placeholder titles
    pub fn context(&self) -> Option<&str> {
        let term = match self {
            SourceQuery::Interest(topics) => topics.first().map(String::as_str),
            SourceQuery::Location(place) => Some(place.as_str()),
            SourceQuery::Trending => None,
        };
        term.filter(|t| !t.trim().is_empty())
    }
}

/// Why a source produced no data. Never fatal to feed composition.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{provider} is not configured (missing API key)")]
    NotConfigured { provider: &'static str },

    #[error("{provider} request timed out after {timeout_ms}ms")]
    Timeout {
        provider: &'static str,
        timeout_ms: u64,
    },

    #[error("{provider} returned HTTP {status}")]
    Status { provider: &'static str, status: u16 },

    #[error("{provider} transport error: {message}")]
    Transport {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} returned an undecodable payload: {message}")]
    Decode {
        provider: &'static str,
        message: String,
    },
}

impl SourceError {
    /// Classify a reqwest failure
    pub fn from_reqwest(provider: &'static str, err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            SourceError::Timeout {
                provider,
                timeout_ms: timeout.as_millis() as u64,
            }
        } else if err.is_decode() {
            SourceError::Decode {
                provider,
                message: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            SourceError::Status {
                provider,
                status: status.as_u16(),
            }
        } else {
            SourceError::Transport {
                provider,
                message: err.to_string(),
            }
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, SourceError::Timeout { .. })
    }
}

pub type SourceResult = std::result::Result<Vec<RawItem>, SourceError>;

/// A provider of raw content items
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Provider name used as the prefix of recommendation source labels
    fn name(&self) -> &'static str;

    fn kind(&self) -> SourceKind;

    /// Items about any of `topics`, up to `limit` per topic. HTTP providers
    /// only query the first [`MAX_TOPICS_PER_CALL`] topics.
    async fn fetch_by_interest(&self, topics: &[String], limit: usize) -> SourceResult;

    /// Items relevant to a free-text place
    async fn fetch_by_location(&self, place: &str, limit: usize) -> SourceResult;

    /// Globally trending items, no personalisation
    async fn fetch_trending(&self, limit: usize) -> SourceResult;

    /// Dispatch a [`SourceQuery`]
    async fn fetch(&self, query: &SourceQuery, limit: usize) -> SourceResult {
        match query {
            SourceQuery::Interest(topics) => self.fetch_by_interest(topics, limit).await,
            SourceQuery::Location(place) => self.fetch_by_location(place, limit).await,
            SourceQuery::Trending => self.fetch_trending(limit).await,
        }
    }
}
