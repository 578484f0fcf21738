//! The four recommendation strategies and a fixed-key map over them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// A classical recommendation heuristic a platform might apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Strategy {
    #[serde(rename = "Content-Based")]
    ContentBased,
    #[serde(rename = "Collaborative")]
    Collaborative,
    #[serde(rename = "Popularity/Trending")]
    Popularity,
    #[serde(rename = "Demographic")]
    Demographic,
}

impl Strategy {
    /// Fetch and concatenation order
    pub const ALL: [Strategy; 4] = [
        Strategy::ContentBased,
        Strategy::Collaborative,
        Strategy::Popularity,
        Strategy::Demographic,
    ];

    /// Stable snake_case key used in weight maps
    pub fn key(&self) -> &'static str {
        match self {
            Strategy::ContentBased => "content_based",
            Strategy::Collaborative => "collaborative",
            Strategy::Popularity => "popularity",
            Strategy::Demographic => "demographic",
        }
    }

    /// Human-readable label attached to recommendations
    pub fn display_name(&self) -> &'static str {
        match self {
            Strategy::ContentBased => "Content-Based",
            Strategy::Collaborative => "Collaborative",
            Strategy::Popularity => "Popularity/Trending",
            Strategy::Demographic => "Demographic",
        }
    }

    /// Range a recommendation score is sampled from. Scores are only
    /// comparable within one strategy.
    pub fn score_range(&self) -> RangeInclusive<f64> {
        match self {
            Strategy::ContentBased => 0.70..=0.95,
            Strategy::Collaborative => 0.60..=0.85,
            Strategy::Popularity => 0.80..=1.00,
            Strategy::Demographic => 0.65..=0.90,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One value per strategy, serialized as a four-key map.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StrategyMap<T> {
    pub content_based: T,
    pub collaborative: T,
    pub popularity: T,
    pub demographic: T,
}

impl<T: Copy> StrategyMap<T> {
    pub fn splat(value: T) -> Self {
        Self {
            content_based: value,
            collaborative: value,
            popularity: value,
            demographic: value,
        }
    }

    pub fn get(&self, strategy: Strategy) -> T {
        match strategy {
            Strategy::ContentBased => self.content_based,
            Strategy::Collaborative => self.collaborative,
            Strategy::Popularity => self.popularity,
            Strategy::Demographic => self.demographic,
        }
    }

    pub fn get_mut(&mut self, strategy: Strategy) -> &mut T {
        match strategy {
            Strategy::ContentBased => &mut self.content_based,
            Strategy::Collaborative => &mut self.collaborative,
            Strategy::Popularity => &mut self.popularity,
            Strategy::Demographic => &mut self.demographic,
        }
    }

    /// Entries in [`Strategy::ALL`] order
    pub fn iter(&self) -> impl Iterator<Item = (Strategy, T)> + '_ {
        Strategy::ALL.into_iter().map(move |s| (s, self.get(s)))
    }

    /// Apply `f` to every entry in [`Strategy::ALL`] order. The order is
    /// fixed so a stateful `f` (e.g. one drawing from an RNG) is reproducible.
    pub fn map<U: Copy + Default>(&self, mut f: impl FnMut(Strategy, T) -> U) -> StrategyMap<U> {
        let mut out = StrategyMap::<U>::default();
        for s in Strategy::ALL {
            *out.get_mut(s) = f(s, self.get(s));
        }
        out
    }
}

impl StrategyMap<f64> {
    pub fn total(&self) -> f64 {
        self.iter().map(|(_, v)| v).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iter_follows_fetch_order() {
        let m = StrategyMap {
            content_based: 1,
            collaborative: 2,
            popularity: 3,
            demographic: 4,
        };
        let order: Vec<_> = m.iter().collect();
        assert_eq!(
            order,
            vec![
                (Strategy::ContentBased, 1),
                (Strategy::Collaborative, 2),
                (Strategy::Popularity, 3),
                (Strategy::Demographic, 4),
            ]
        );
    }

    #[test]
    fn test_serializes_with_strategy_keys() {
        let m = StrategyMap::splat(0.25);
        let json = serde_json::to_value(m).unwrap();
        for s in Strategy::ALL {
            assert_eq!(json[s.key()], 0.25);
        }
        assert_eq!(
            serde_json::to_string(&Strategy::Popularity).unwrap(),
            "\"Popularity/Trending\""
        );
    }

    #[test]
    fn test_score_ranges_within_unit_interval() {
        for s in Strategy::ALL {
            let r = s.score_range();
            assert!(*r.start() >= 0.0 && *r.end() <= 1.0 && r.start() < r.end());
        }
    }
}
