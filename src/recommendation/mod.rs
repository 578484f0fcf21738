//! Recommendation Module
//!
//! Reverse-infers which recommendation strategies a platform would lean on for
//! a synthetic user, then composes a feed that mixes content accordingly.
//!
//! ## Architecture
//!
//! 1. **Strategy** - The four classical heuristics and a fixed-key map over them
//! 2. **Inference** - Score each strategy from the profile, normalise, add bounded noise
//! 3. **Topics** - Static topic adjacency standing in for "similar users"
//! 4. **Composer** - Allocate per-strategy quotas, fetch, shuffle and truncate
//! 5. **Metrics** - Summarise what ended up in the feed
//!
//! ## Score Ranges
//!
//! Each recommendation's score is sampled uniformly from its strategy's range:
//! - Content-Based: 0.70 - 0.95
//! - Collaborative: 0.60 - 0.85
//! - Popularity/Trending: 0.80 - 1.00
//! - Demographic: 0.65 - 0.90
//!
//! Scores are not comparable across strategies.

pub mod composer;
pub mod inference;
pub mod metrics;
pub mod strategy;
pub mod topics;

pub use composer::{allocate_quotas, FeedComposer, Recommendation};
pub use inference::{heuristic_scores, InferenceEngine, WeightDistribution};
pub use metrics::FeedSummary;
pub use strategy::{Strategy, StrategyMap};
