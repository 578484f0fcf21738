//! Feed Metrics and Performance Monitoring
//!
//! Summary statistics over a composed feed, plus a drop-guard timer used to
//! trace how long composition steps take.

use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;

use super::composer::Recommendation;
use super::strategy::Strategy;

/// Source-type buckets, derived from the provider prefix of a source label
pub const SOURCE_TYPES: [&str; 3] = ["NewsAPI", "Reddit", "Other"];

/// Per-algorithm statistics
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AlgorithmStats {
    pub count: usize,
    /// Fraction of the whole feed
    pub share: f64,
    pub mean_score: f64,
}

/// Composition statistics for one feed
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FeedSummary {
    pub total: usize,
    pub by_algorithm: BTreeMap<Strategy, AlgorithmStats>,
    pub by_source_type: BTreeMap<&'static str, usize>,
    /// Items standing in for an unavailable provider
    pub placeholders: usize,
}

/// `"NewsAPI"`, `"Reddit"` or `"Other"` for a recommendation source label
pub fn source_type(source: &str) -> &'static str {
    SOURCE_TYPES[..2]
        .iter()
        .find(|t| source.contains(*t))
        .copied()
        .unwrap_or("Other")
}

impl FeedSummary {
    pub fn from_feed(feed: &[Recommendation]) -> Self {
        let total = feed.len();
        let mut score_sums: BTreeMap<Strategy, (usize, f64)> = BTreeMap::new();
        let mut by_source_type = BTreeMap::new();

        for rec in feed {
            let entry = score_sums.entry(rec.algorithm).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += rec.score;
            *by_source_type.entry(source_type(&rec.source)).or_insert(0) += 1;
        }

        let by_algorithm = score_sums
            .into_iter()
            .map(|(strategy, (count, sum))| {
                let stats = AlgorithmStats {
                    count,
                    share: count as f64 / total as f64,
                    mean_score: sum / count as f64,
                };
                (strategy, stats)
            })
            .collect();

        Self {
            total,
            by_algorithm,
            by_source_type,
            placeholders: feed.iter().filter(|r| !r.has_link()).count(),
        }
    }

    /// Count for `strategy`, 0 when absent
    pub fn count(&self, strategy: Strategy) -> usize {
        self.by_algorithm.get(&strategy).map_or(0, |s| s.count)
    }

    /// Flag compositions worth a second look
    pub fn detect_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.total == 0 {
            issues.push("Empty feed".to_string());
            return issues;
        }

        let placeholder_ratio = self.placeholders as f64 / self.total as f64;
        if placeholder_ratio > 0.5 {
            issues.push(format!(
                "High placeholder ratio: {:.1}%",
                placeholder_ratio * 100.0
            ));
        }

        // Truncation can drop a strategy that was allotted a slot
        for strategy in Strategy::ALL {
            if self.count(strategy) == 0 {
                issues.push(format!("{} missing from feed", strategy));
            }
        }

        issues
    }
}

/// Performance timer for tracking operation duration
pub struct PerformanceTimer {
    start: Instant,
    label: &'static str,
}

impl PerformanceTimer {
    pub fn new(label: &'static str) -> Self {
        Self {
            start: Instant::now(),
            label,
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

impl Drop for PerformanceTimer {
    fn drop(&mut self) {
        tracing::debug!("⏱️ {} completed in {}ms", self.label, self.elapsed_ms());
    }
}
