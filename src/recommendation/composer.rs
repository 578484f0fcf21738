//! Feed Composer
//!
//! Turns a [`WeightDistribution`] into a blended feed:
//!
//! 1. **Quotas** - each strategy gets `max(1, floor(weight * target))` slots.
//!    The floor of 1 is intentional: low-weight strategies always get a slot,
//!    so the quotas may add up to more than the target.
//! 2. **Fetch** - each strategy queries one or two content sources and maps raw
//!    items to [`Recommendation`]s scored from the strategy's range. A source
//!    that errors or returns nothing is replaced by local placeholders.
//! 3. **Assembly** - concatenate in [`Strategy::ALL`] order, shuffle, truncate
//!    to the target. Truncation absorbs the over-allocation from step 1.
//!
//! Fetches run one after another; nothing is fetched concurrently.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::inference::WeightDistribution;
use super::metrics::PerformanceTimer;
use super::strategy::{Strategy, StrategyMap};
use super::topics::related_topics;
use crate::profile::Profile;
use crate::sources::placeholder::{self, NO_LINK};
use crate::sources::{ContentSource, RawItem, SourceKind, SourceQuery};

/// Maximum description length kept on a recommendation
pub const DESCRIPTION_MAX_CHARS: usize = 200;

/// Content-based queries use this many of the profile's leading interests
const CONTENT_TOPICS: usize = 2;

/// A scored feed entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    /// Human-readable provider label, e.g. `"NewsAPI - BBC News"`
    pub source: String,
    /// `"#"` when there is no real link
    pub url: String,
    pub algorithm: Strategy,
    /// Only comparable within one algorithm
    pub score: f64,
    pub description: String,
    pub published_at: Option<String>,
}

impl Recommendation {
    pub fn has_link(&self) -> bool {
        self.url != NO_LINK
    }
}

/// Provisional slot count per strategy
pub type Quotas = StrategyMap<usize>;

/// `max(1, floor(weight * target_size))` for every strategy
pub fn allocate_quotas(weights: &WeightDistribution, target_size: usize) -> Quotas {
    weights
        .as_map()
        .map(|_, w| ((w * target_size as f64).floor() as usize).max(1))
}

/// Split a quota across a primary and a secondary source. Each gets half
/// (rounded down), except the primary never gets less than one.
fn split_quota(quota: usize) -> (usize, usize) {
    ((quota / 2).max(1), quota / 2)
}

/// Keep at most `max` characters
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

fn describe(strategy: Strategy, kind: SourceKind, item: &RawItem, profile: &Profile) -> String {
    let upvotes = item.popularity_score.unwrap_or(0);
    match (strategy, kind) {
        (Strategy::ContentBased, SourceKind::News) => item.description.clone().unwrap_or_default(),
        (Strategy::ContentBased, SourceKind::LinkAggregator) => format!("Score: {}", upvotes),
        (Strategy::Collaborative, _) => "Based on similar users' preferences".to_string(),
        (Strategy::Popularity, SourceKind::News) => "Trending now".to_string(),
        (Strategy::Popularity, SourceKind::LinkAggregator) => {
            format!("Popular with {} upvotes", upvotes)
        }
        (Strategy::Demographic, _) => format!("Relevant to {}", profile.location()),
    }
}

/// Fetch from `source`, substituting placeholders for any failure or empty answer
async fn fetch_or_placeholder(
    source: &dyn ContentSource,
    query: &SourceQuery,
    limit: usize,
) -> Vec<RawItem> {
    match source.fetch(query, limit).await {
        Ok(items) if !items.is_empty() => items,
        Ok(_) => {
            info!("{} returned no items for {:?}, using placeholders", source.name(), query);
            placeholder::items_for(source.kind(), query)
        }
        Err(e) => {
            warn!("{} unavailable ({}), using placeholders", source.name(), e);
            placeholder::items_for(source.kind(), query)
        }
    }
}

/// Blends content from a news-like and a link-aggregator-like source
#[derive(Clone)]
pub struct FeedComposer {
    news: Arc<dyn ContentSource>,
    aggregator: Arc<dyn ContentSource>,
}

impl FeedComposer {
    pub fn new(news: Arc<dyn ContentSource>, aggregator: Arc<dyn ContentSource>) -> Self {
        Self { news, aggregator }
    }

    /// Compose the final feed: at most `target_size` items, exactly
    /// `min(target_size, pool size)`.
    pub async fn compose<R: Rng + ?Sized>(
        &self,
        profile: &Profile,
        weights: &WeightDistribution,
        target_size: usize,
        rng: &mut R,
    ) -> Vec<Recommendation> {
        let _timer = PerformanceTimer::new("compose_feed");

        let mut feed = self.candidate_pool(profile, weights, target_size, rng).await;
        let available = feed.len();

        feed.shuffle(rng);
        feed.truncate(target_size);

        info!(
            "Composed feed for {}: {} items ({} candidates, target {})",
            profile.name(),
            feed.len(),
            available,
            target_size
        );
        feed
    }

    /// Every strategy's recommendations concatenated in [`Strategy::ALL`]
    /// order, before shuffling and truncation.
    pub async fn candidate_pool<R: Rng + ?Sized>(
        &self,
        profile: &Profile,
        weights: &WeightDistribution,
        target_size: usize,
        rng: &mut R,
    ) -> Vec<Recommendation> {
        let quotas = allocate_quotas(weights, target_size);
        let mut pool = Vec::new();

        for (strategy, quota) in quotas.iter() {
            if quota == 0 {
                continue;
            }
            let batch = self.recommend(strategy, profile, quota, rng).await;
            debug!("{}: quota {}, produced {}", strategy, quota, batch.len());
            pool.extend(batch);
        }

        pool
    }

    async fn recommend<R: Rng + ?Sized>(
        &self,
        strategy: Strategy,
        profile: &Profile,
        quota: usize,
        rng: &mut R,
    ) -> Vec<Recommendation> {
        match strategy {
            Strategy::ContentBased => {
                let query = SourceQuery::Interest(profile.top_interests(CONTENT_TOPICS).to_vec());
                self.draw_split(&query, quota, strategy, profile, rng).await
            }
            Strategy::Collaborative => {
                let query = SourceQuery::Interest(related_topics(profile.interests()));
                self.draw(&*self.aggregator, &query, quota, quota, strategy, profile, rng)
                    .await
            }
            Strategy::Popularity => {
                self.draw_split(&SourceQuery::Trending, quota, strategy, profile, rng)
                    .await
            }
            Strategy::Demographic => {
                let query = SourceQuery::Location(profile.location().to_string());
                self.draw(&*self.news, &query, quota, quota, strategy, profile, rng)
                    .await
            }
        }
    }

    /// Query both sources with the same query, splitting `quota` between them.
    /// Each source is asked for one more item than its share.
    async fn draw_split<R: Rng + ?Sized>(
        &self,
        query: &SourceQuery,
        quota: usize,
        strategy: Strategy,
        profile: &Profile,
        rng: &mut R,
    ) -> Vec<Recommendation> {
        let request = quota / 2 + 1;
        let (news_share, aggregator_share) = split_quota(quota);

        let mut recs = self
            .draw(&*self.news, query, request, news_share, strategy, profile, rng)
            .await;
        recs.extend(
            self.draw(&*self.aggregator, query, request, aggregator_share, strategy, profile, rng)
                .await,
        );
        recs
    }

    /// Request `request` items from `source`, keep the first `take`
    #[allow(clippy::too_many_arguments)]
    async fn draw<R: Rng + ?Sized>(
        &self,
        source: &dyn ContentSource,
        query: &SourceQuery,
        request: usize,
        take: usize,
        strategy: Strategy,
        profile: &Profile,
        rng: &mut R,
    ) -> Vec<Recommendation> {
        if take == 0 {
            return Vec::new();
        }

        let items = fetch_or_placeholder(source, query, request).await;
        let mut recs = Vec::with_capacity(take.min(items.len()));
        for item in items.into_iter().take(take) {
            recs.push(Self::to_recommendation(strategy, source, item, profile, rng));
        }
        recs
    }

    fn to_recommendation<R: Rng + ?Sized>(
        strategy: Strategy,
        source: &dyn ContentSource,
        item: RawItem,
        profile: &Profile,
        rng: &mut R,
    ) -> Recommendation {
        let description = describe(strategy, source.kind(), &item, profile);
        let label = item
            .provider_label
            .as_deref()
            .filter(|l| !l.trim().is_empty())
            .unwrap_or("Unknown");

        Recommendation {
            source: format!("{} - {}", source.name(), label),
            url: item
                .url
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| NO_LINK.to_string()),
            algorithm: strategy,
            score: rng.gen_range(strategy.score_range()),
            description: truncate_chars(&description, DESCRIPTION_MAX_CHARS),
            published_at: item.published_at,
            title: item.title,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ProfileInput;
    use crate::sources::{SourceError, SourceResult};
    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Mutex;

    /// Source answering every call with `per_call` items, or failing
    struct StubSource {
        name: &'static str,
        kind: SourceKind,
        per_call: Option<usize>,
        calls: Mutex<Vec<(SourceQuery, usize)>>,
    }

    impl StubSource {
        fn new(name: &'static str, kind: SourceKind, per_call: Option<usize>) -> Arc<Self> {
            Arc::new(Self {
                name,
                kind,
                per_call,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn answer(&self, query: SourceQuery, limit: usize) -> SourceResult {
            self.calls.lock().unwrap().push((query, limit));
            match self.per_call {
                Some(n) => Ok((0..n.min(limit))
                    .map(|i| RawItem {
                        title: format!("{} item {}", self.name, i),
                        provider_label: Some("desk".into()),
                        url: Some(format!("https://example.com/{}", i)),
                        description: Some("x".repeat(300)),
                        published_at: None,
                        popularity_score: Some(7),
                    })
                    .collect()),
                None => Err(SourceError::Status {
                    provider: self.name,
                    status: 503,
                }),
            }
        }
    }

    #[async_trait]
    impl ContentSource for StubSource {
        fn name(&self) -> &'static str {
            self.name
        }

        fn kind(&self) -> SourceKind {
            self.kind
        }

        async fn fetch_by_interest(&self, topics: &[String], limit: usize) -> SourceResult {
            self.answer(SourceQuery::Interest(topics.to_vec()), limit)
        }

        async fn fetch_by_location(&self, place: &str, limit: usize) -> SourceResult {
            self.answer(SourceQuery::Location(place.to_string()), limit)
        }

        async fn fetch_trending(&self, limit: usize) -> SourceResult {
            self.answer(SourceQuery::Trending, limit)
        }
    }

    fn weights(cb: f64, co: f64, po: f64, de: f64) -> WeightDistribution {
        WeightDistribution::normalized(StrategyMap {
            content_based: cb,
            collaborative: co,
            popularity: po,
            demographic: de,
        })
    }

    fn composer(per_call: Option<usize>) -> (FeedComposer, Arc<StubSource>, Arc<StubSource>) {
        let news = StubSource::new("NewsAPI", SourceKind::News, per_call);
        let agg = StubSource::new("Reddit", SourceKind::LinkAggregator, per_call);
        (FeedComposer::new(news.clone(), agg.clone()), news, agg)
    }

    fn count(feed: &[Recommendation], s: Strategy) -> usize {
        feed.iter().filter(|r| r.algorithm == s).count()
    }

    #[test]
    fn test_quota_floor_of_one() {
        let q = allocate_quotas(&weights(1.0, 0.0, 0.0, 0.0), 10);
        assert_eq!(q.content_based, 10);
        assert_eq!(q.collaborative, 1);
        assert_eq!(q.popularity, 1);
        assert_eq!(q.demographic, 1);
    }

    #[test]
    fn test_quota_uses_floor() {
        let q = allocate_quotas(&weights(0.45, 0.25, 0.2, 0.1), 15);
        assert_eq!(q.content_based, 6);
        assert_eq!(q.collaborative, 3);
        assert_eq!(q.popularity, 3);
        assert_eq!(q.demographic, 1);
    }

    #[test]
    fn test_degenerate_weights_give_floor_quotas() {
        let q = allocate_quotas(&weights(0.0, 0.0, 0.0, 0.0), 20);
        assert_eq!(q, StrategyMap::splat(1));
    }

    #[test]
    fn test_split_quota() {
        assert_eq!(split_quota(1), (1, 0));
        assert_eq!(split_quota(2), (1, 1));
        assert_eq!(split_quota(7), (3, 3));
        assert_eq!(split_quota(10), (5, 5));
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[tokio::test]
    async fn test_single_strategy_weights_scenario() {
        let (composer, _, _) = composer(Some(20));
        let profile = Profile::sample();
        let w = weights(1.0, 0.0, 0.0, 0.0);
        let mut rng = StdRng::seed_from_u64(3);

        let pool = composer.candidate_pool(&profile, &w, 10, &mut rng).await;
        assert_eq!(pool.len(), 13);
        assert_eq!(count(&pool, Strategy::ContentBased), 10);
        assert_eq!(count(&pool, Strategy::Collaborative), 1);
        assert_eq!(count(&pool, Strategy::Popularity), 1);
        assert_eq!(count(&pool, Strategy::Demographic), 1);

        let feed = composer.compose(&profile, &w, 10, &mut rng).await;
        assert_eq!(feed.len(), 10);
    }

    #[tokio::test]
    async fn test_pool_follows_strategy_order() {
        let (composer, _, _) = composer(Some(20));
        let pool = composer
            .candidate_pool(
                &Profile::sample(),
                &weights(0.25, 0.25, 0.25, 0.25),
                16,
                &mut StdRng::seed_from_u64(9),
            )
            .await;
        let order: Vec<Strategy> = pool.iter().map(|r| r.algorithm).collect();
        let mut sorted = order.clone();
        sorted.sort();
        assert_eq!(order, sorted);
    }

    #[tokio::test]
    async fn test_unavailable_sources_fall_back_to_placeholders() {
        let (composer, _, _) = composer(None);
        let profile = Profile::sample();
        let w = weights(0.4, 0.3, 0.2, 0.1);
        let mut rng = StdRng::seed_from_u64(11);

        let pool = composer.candidate_pool(&profile, &w, 15, &mut rng).await;
        for s in Strategy::ALL {
            assert!(count(&pool, s) >= 1, "{} missing from pool", s);
        }
        assert!(pool.iter().all(|r| !r.has_link()));

        let feed = composer.compose(&profile, &w, 15, &mut rng).await;
        assert!(!feed.is_empty());
        assert!(feed.len() <= 15);
    }

    #[tokio::test]
    async fn test_empty_answers_fall_back_to_placeholders() {
        let (composer, _, _) = composer(Some(0));
        let pool = composer
            .candidate_pool(
                &Profile::sample(),
                &weights(0.0, 0.0, 0.0, 0.0),
                4,
                &mut StdRng::seed_from_u64(1),
            )
            .await;
        assert_eq!(pool.len(), 4);
        assert!(pool[0].source.starts_with("NewsAPI - Placeholder"));
    }

    #[tokio::test]
    async fn test_feed_length_is_min_of_target_and_pool() {
        let (composer, _, _) = composer(Some(1));
        let profile = Profile::sample();
        let w = weights(0.25, 0.25, 0.25, 0.25);

        for target in [4, 8, 12, 40] {
            let mut rng = StdRng::seed_from_u64(target as u64);
            let pool = composer.candidate_pool(&profile, &w, target, &mut rng).await;
            let feed = composer.compose(&profile, &w, target, &mut rng).await;
            assert_eq!(feed.len(), target.min(pool.len()));
        }
    }

    #[tokio::test]
    async fn test_queries_sent_per_strategy() {
        let (composer, news, agg) = composer(Some(20));
        let profile = ProfileInput {
            location: "Berlin, Germany".into(),
            interests: ["music", "science", "art"].map(String::from).to_vec(),
            ..Default::default()
        }
        .build();

        composer
            .candidate_pool(
                &profile,
                &weights(0.5, 0.2, 0.2, 0.1),
                10,
                &mut StdRng::seed_from_u64(5),
            )
            .await;

        let news_calls = news.calls.lock().unwrap().clone();
        let agg_calls = agg.calls.lock().unwrap().clone();
        let top_two = SourceQuery::Interest(vec!["music".into(), "science".into()]);

        // content_based quota 5 requests 5/2 + 1 from each source
        assert_eq!(news_calls[0], (top_two.clone(), 3));
        assert_eq!(agg_calls[0], (top_two, 3));
        assert_eq!(
            agg_calls[1],
            (
                SourceQuery::Interest(vec![
                    "concerts".into(),
                    "instruments".into(),
                    "audio".into()
                ]),
                2
            )
        );
        assert_eq!(news_calls[1], (SourceQuery::Trending, 2));
        assert_eq!(agg_calls[2], (SourceQuery::Trending, 2));
        assert_eq!(
            news_calls.last().unwrap(),
            &(SourceQuery::Location("Berlin, Germany".into()), 1)
        );
    }

    #[tokio::test]
    async fn test_recommendation_mapping() {
        let (composer, _, _) = composer(Some(20));
        let profile = Profile::sample();
        let pool = composer
            .candidate_pool(
                &profile,
                &weights(0.25, 0.25, 0.25, 0.25),
                12,
                &mut StdRng::seed_from_u64(2),
            )
            .await;

        for rec in &pool {
            assert!(rec.score >= *rec.algorithm.score_range().start());
            assert!(rec.score <= *rec.algorithm.score_range().end());
            assert!(rec.description.chars().count() <= DESCRIPTION_MAX_CHARS);
            assert!(rec.source.ends_with(" - desk"));
        }

        let demo = pool
            .iter()
            .find(|r| r.algorithm == Strategy::Demographic)
            .unwrap();
        assert_eq!(demo.description, "Relevant to San Francisco, USA");
        let collab = pool
            .iter()
            .find(|r| r.algorithm == Strategy::Collaborative)
            .unwrap();
        assert_eq!(collab.description, "Based on similar users' preferences");
        assert!(pool.iter().any(|r| {
            r.algorithm == Strategy::Popularity && r.description == "Popular with 7 upvotes"
        }));
    }

    #[tokio::test]
    async fn test_compose_is_deterministic_for_seed() {
        let (composer, _, _) = composer(Some(20));
        let profile = Profile::sample();
        let w = weights(0.4, 0.3, 0.2, 0.1);
        let a = composer
            .compose(&profile, &w, 15, &mut StdRng::seed_from_u64(77))
            .await;
        let b = composer
            .compose(&profile, &w, 15, &mut StdRng::seed_from_u64(77))
            .await;
        assert_eq!(a, b);
    }
}
