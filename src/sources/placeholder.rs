//! Locally generated stand-in items for unavailable sources.
//!
//! Always non-empty and never touches the network, so feed composition cannot
//! stall on a provider outage.

use chrono::Utc;

use super::{RawItem, SourceKind, SourceQuery};

/// Sentinel url meaning "no real link"
pub const NO_LINK: &str = "#";

fn item(
    title: String,
    label: &str,
    description: &str,
    published_at: Option<String>,
    score: Option<i64>,
) -> RawItem {
    RawItem {
        title,
        provider_label: Some(label.to_string()),
        url: Some(NO_LINK.to_string()),
        description: Some(description.to_string()),
        published_at,
        popularity_score: score,
    }
}

/// Placeholder items standing in for `kind` answering `query`
pub fn items_for(kind: SourceKind, query: &SourceQuery) -> Vec<RawItem> {
    match kind {
        SourceKind::News => news_items(query),
        SourceKind::LinkAggregator => aggregator_items(query),
    }
}

fn news_items(query: &SourceQuery) -> Vec<RawItem> {
    let now = Some(Utc::now().to_rfc3339());
    match query {
        SourceQuery::Interest(_) => vec![
            item(
                format!(
                    "Breaking: Major developments in {}",
                    query.context().unwrap_or("technology")
                ),
                "Placeholder News",
                "This is placeholder content - API key needed",
                now.clone(),
                None,
            ),
            item(
                format!("Expert insights on {}", query.context().unwrap_or("science")),
                "Placeholder Times",
                "Configure NewsAPI key for real content",
                now,
                None,
            ),
        ],
        SourceQuery::Location(_) => vec![item(
            format!("Local news from {}", query.context().unwrap_or("your area")),
            "Local Placeholder",
            "Location-based placeholder content",
            now,
            None,
        )],
        SourceQuery::Trending => vec![item(
            "Trending: Major global event captures attention".to_string(),
            "Trending Placeholder",
            "Trending placeholder content",
            now,
            None,
        )],
    }
}

fn aggregator_items(query: &SourceQuery) -> Vec<RawItem> {
    let now = Some(Utc::now().to_rfc3339());
    vec![
        item(
            format!(
                "Popular discussion about {}",
                query.context().unwrap_or("trending topics")
            ),
            "r/placeholder",
            "Placeholder discussion",
            now.clone(),
            Some(1000),
        ),
        item(
            "Placeholder Reddit content - API temporarily unavailable".to_string(),
            "r/placeholder",
            "Placeholder discussion",
            now,
            Some(500),
        ),
    ]
}
