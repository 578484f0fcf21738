//! Strategy Weight Inference
//!
//! Estimates how much weight each recommendation strategy would plausibly get
//! for a profile. Four additive heuristic scores are normalised, perturbed with
//! bounded uniform noise, clamped and normalised again.
//!
//! The engine holds no per-call state; randomness comes from the caller so a
//! seeded RNG makes the result reproducible.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

use super::strategy::{Strategy, StrategyMap};
use crate::profile::{ActivityLevel, Profile, TechSavviness};

/// Default half-width of the uniform noise added after the first normalisation
pub const DEFAULT_NOISE: f64 = 0.05;

/// Probability distribution over the four strategies.
///
/// Every value is in `[0, 1]`; the values sum to 1 unless all heuristic
/// scores were zero, in which case every value is 0. Deserialized maps that
/// break this are renormalised.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "StrategyMap<f64>", into = "StrategyMap<f64>")]
pub struct WeightDistribution(StrategyMap<f64>);

impl From<StrategyMap<f64>> for WeightDistribution {
    fn from(raw: StrategyMap<f64>) -> Self {
        let in_range = raw.iter().all(|(_, v)| (0.0..=1.0).contains(&v));
        let total = raw.total();
        if in_range && (total == 0.0 || (total - 1.0).abs() < 1e-9) {
            Self(raw)
        } else {
            Self::normalized(raw)
        }
    }
}

impl From<WeightDistribution> for StrategyMap<f64> {
    fn from(weights: WeightDistribution) -> Self {
        weights.0
    }
}

impl WeightDistribution {
    /// Build a distribution from arbitrary caller values. Negative and
    /// non-finite entries become 0 before normalising.
    pub fn normalized(raw: StrategyMap<f64>) -> Self {
        let cleaned = raw.map(|_, v| if v.is_finite() && v > 0.0 { v } else { 0.0 });
        Self(normalize(cleaned))
    }

    pub fn get(&self, strategy: Strategy) -> f64 {
        self.0.get(strategy)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Strategy, f64)> + '_ {
        self.0.iter()
    }

    pub fn total(&self) -> f64 {
        self.0.total()
    }

    pub fn as_map(&self) -> &StrategyMap<f64> {
        &self.0
    }

    /// Strategies by descending weight; ties keep fetch order
    pub fn ranked(&self) -> Vec<(Strategy, f64)> {
        let mut ranked: Vec<_> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        ranked
    }

    pub fn dominant(&self) -> Strategy {
        self.ranked()[0].0
    }
}

/// Divide every entry by the total. A zero total leaves the map unchanged.
fn normalize(scores: StrategyMap<f64>) -> StrategyMap<f64> {
    let total = scores.total();
    if total > 0.0 {
        scores.map(|_, v| v / total)
    } else {
        scores
    }
}

/// Pre-normalisation heuristic score of each strategy.
pub fn heuristic_scores(profile: &Profile) -> StrategyMap<f64> {
    let interests = profile.interests().len();
    let age = profile.age();
    let activity = profile.activity_level();
    let tech = profile.tech_savviness();

    // Content-based: breadth of stated interests, tech comfort, engaged specialists
    let mut content_based = (interests as f64 * 0.2).min(1.0) * 0.4;
    content_based += match tech {
        TechSavviness::High => 0.2,
        TechSavviness::Average => 0.1,
        TechSavviness::Low => 0.0,
    };
    if activity == ActivityLevel::High && interests > 3 {
        content_based += 0.15;
    }
    if profile.education_level().is_tertiary() {
        content_based += 0.1;
    }

    // Collaborative: network size, activity, most-active age group
    let mut collaborative = (profile.social_connectivity() as f64 / 100.0) * 0.5;
    collaborative += match activity {
        ActivityLevel::High => 0.2,
        ActivityLevel::Moderate => 0.1,
        ActivityLevel::Low => 0.0,
    };
    if (25..=45).contains(&age) {
        collaborative += 0.15;
    }

    // Popularity: younger, passive, or less technical users
    let mut popularity = if age < 25 {
        0.4
    } else if age < 35 {
        0.25
    } else {
        0.1
    };
    if activity == ActivityLevel::Low {
        popularity += 0.2;
    }
    if tech == TechSavviness::Low {
        popularity += 0.15;
    }

    // Demographic: base term plus targeting attributes
    let mut demographic = 0.15;
    demographic += if age < 18 || age > 65 { 0.25 } else { 0.1 };
    if !profile.location().is_empty() {
        demographic += 0.15;
    }
    demographic += 0.05;
    if !profile.occupation().is_empty() {
        demographic += 0.1;
    }
    if profile.personality_traits().len() > 3 {
        demographic += 0.1;
    }

    StrategyMap {
        content_based,
        collaborative,
        popularity,
        demographic,
    }
}

/// Weight inference engine
#[derive(Debug, Clone, Copy)]
pub struct InferenceEngine {
    noise: f64,
}

impl Default for InferenceEngine {
    fn default() -> Self {
        Self {
            noise: DEFAULT_NOISE,
        }
    }
}

impl InferenceEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with a custom noise half-width; 0 disables perturbation.
    /// The width is clamped to `[0, 1]` and non-finite values count as 0.
    pub fn with_noise(noise: f64) -> Self {
        let noise = if noise.is_finite() {
            noise.abs().min(1.0)
        } else {
            0.0
        };
        Self { noise }
    }

    /// Infer the strategy distribution for `profile`, drawing one noise
    /// sample per strategy from `rng` in [`Strategy::ALL`] order.
    pub fn infer<R: Rng + ?Sized>(&self, profile: &Profile, rng: &mut R) -> WeightDistribution {
        let scores = heuristic_scores(profile);
        let normalized = normalize(scores);

        let noise = self.noise;
        let perturbed = normalized.map(|_, v| {
            let jitter = if noise > 0.0 {
                rng.gen_range(-noise..=noise)
            } else {
                0.0
            };
            (v + jitter).clamp(0.0, 1.0)
        });

        let weights = WeightDistribution(normalize(perturbed));
        debug!(
            profile = profile.name(),
            ?scores,
            weights = ?weights.as_map(),
            "Inferred strategy weights"
        );
        weights
    }
}
