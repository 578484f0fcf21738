//! Text rendering and export of an analysis run
//!
//! Renderers return `String`s; printing them is left to the binary. A run is
//! captured as a [`Snapshot`] that can be exported as a human-readable text
//! report or as JSON, and JSON snapshots can be loaded back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::profile::Profile;
use crate::recommendation::composer::truncate_chars;
use crate::recommendation::metrics::FeedSummary;
use crate::recommendation::{Recommendation, Strategy, WeightDistribution};

const BAR_WIDTH: usize = 50;
const TITLE_DISPLAY_CHARS: usize = 70;
const DESCRIPTION_DISPLAY_CHARS: usize = 100;
const MAX_PER_GROUP: usize = 5;

fn rule(c: char, width: usize) -> String {
    std::iter::repeat(c).take(width).collect()
}

/// Cap `text` at `max` characters, marking the cut with "..."
fn ellipsize(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", truncate_chars(text, max))
    } else {
        text.to_string()
    }
}

fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

/// Title-case display name of a weight key, e.g. "Content Based"
fn weight_label(strategy: Strategy) -> String {
    strategy
        .key()
        .split('_')
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn dominant_analysis(strategy: Strategy) -> [&'static str; 2] {
    match strategy {
        Strategy::ContentBased => [
            "→ Platforms would primarily use Content-Based Filtering",
            "  Your specific interests drive most recommendations",
        ],
        Strategy::Collaborative => [
            "→ Platforms would primarily use Collaborative Filtering",
            "  Your behavior would be compared with similar users",
        ],
        Strategy::Popularity => [
            "→ Platforms would primarily use Popularity/Trending algorithms",
            "  You'd see mostly trending and viral content",
        ],
        Strategy::Demographic => [
            "→ Platforms would primarily use Demographic Filtering",
            "  Your age, location, and demographics drive recommendations",
        ],
    }
}

fn profile_lines(profile: &Profile) -> Vec<String> {
    vec![
        format!("Age: {}", profile.age()),
        format!("Gender: {}", profile.gender().label()),
        format!("Location: {}", profile.location()),
        format!("Occupation: {}", profile.occupation()),
        format!("Education: {}", profile.education_level().label()),
        format!("Interests: {}", profile.interests().join(", ")),
        format!("Personality: {}", profile.personality_traits().join(", ")),
        format!("Activity Level: {}", profile.activity_level().as_str()),
        format!("Tech Savviness: {}", profile.tech_savviness().as_str()),
        format!("Social Connectivity: {}%", profile.social_connectivity()),
    ]
}

pub fn render_profile(profile: &Profile) -> String {
    let mut lines = vec![
        rule('=', 80),
        format!("CHARACTER PROFILE: {}", profile.name()),
        rule('=', 80),
    ];
    lines.extend(profile_lines(profile));
    lines.join("\n")
}

/// Weight bars sorted by descending weight, followed by the dominant-strategy analysis
pub fn render_weights(weights: &WeightDistribution) -> String {
    let mut lines = vec![
        rule('-', 80),
        "INFERRED RECOMMENDATION ALGORITHMS".to_string(),
        rule('-', 80),
        String::new(),
        "Platforms would likely use these algorithms for you:".to_string(),
        String::new(),
    ];

    for (strategy, weight) in weights.ranked() {
        let filled = ((weight * BAR_WIDTH as f64) as usize).min(BAR_WIDTH);
        let bar = format!("{}{}", rule('█', filled), rule('░', BAR_WIDTH - filled));
        lines.push(format!(
            "{:25} [{}] {}",
            weight_label(strategy),
            bar,
            percent(weight)
        ));
    }

    lines.push(String::new());
    lines.push("Analysis:".to_string());
    lines.extend(dominant_analysis(weights.dominant()).map(String::from));
    lines.push(String::new());
    lines.push("Secondary algorithms would supplement the primary approach.".to_string());
    lines.join("\n")
}

/// Feed grouped by algorithm in order of first appearance, at most five per group
pub fn render_feed(feed: &[Recommendation]) -> String {
    let mut lines = vec![
        rule('-', 80),
        "YOUR PERSONALIZED RECOMMENDATION FEED".to_string(),
        rule('-', 80),
    ];
    if feed.is_empty() {
        lines.push("No recommendations generated.".to_string());
        return lines.join("\n");
    }

    let mut groups: Vec<(Strategy, Vec<&Recommendation>)> = Vec::new();
    for rec in feed {
        match groups.iter_mut().find(|(s, _)| *s == rec.algorithm) {
            Some((_, recs)) => recs.push(rec),
            None => groups.push((rec.algorithm, vec![rec])),
        }
    }

    for (strategy, recs) in groups {
        lines.push(String::new());
        lines.push(format!(
            "📊 {} RECOMMENDATIONS ({} items)",
            strategy.display_name().to_uppercase(),
            recs.len()
        ));
        lines.push(rule('-', 60));

        for (i, rec) in recs.iter().take(MAX_PER_GROUP).enumerate() {
            lines.push(format!("{}. {}", i + 1, ellipsize(&rec.title, TITLE_DISPLAY_CHARS)));
            lines.push(format!("   Source: {}", rec.source));
            lines.push(format!("   Score: {:.2}", rec.score));
            if !rec.description.is_empty() {
                lines.push(format!(
                    "   {}",
                    ellipsize(&rec.description, DESCRIPTION_DISPLAY_CHARS)
                ));
            }
            if rec.has_link() {
                lines.push(format!("   URL: {}", rec.url));
            }
            lines.push(String::new());
        }
    }
    lines.join("\n")
}

pub fn render_summary(profile: &Profile, feed: &[Recommendation]) -> String {
    let summary = FeedSummary::from_feed(feed);
    let mut lines = vec![
        rule('=', 80),
        "SESSION SUMMARY".to_string(),
        rule('=', 80),
        format!("Character: {}", profile.name()),
        format!("Total Recommendations Generated: {}", summary.total),
        String::new(),
        "Recommendations by Algorithm:".to_string(),
    ];
    for (strategy, stats) in &summary.by_algorithm {
        lines.push(format!(
            "  {}: {} ({:.1}%)",
            strategy,
            stats.count,
            stats.share * 100.0
        ));
    }

    lines.push(String::new());
    lines.push("Average Recommendation Scores:".to_string());
    for (strategy, stats) in &summary.by_algorithm {
        lines.push(format!("  {}: {:.3}", strategy, stats.mean_score));
    }

    lines.push(String::new());
    lines.push("Content Sources:".to_string());
    for (source, count) in &summary.by_source_type {
        lines.push(format!(
            "  {}: {} ({:.1}%)",
            source,
            count,
            *count as f64 / summary.total as f64 * 100.0
        ));
    }

    let issues = summary.detect_issues();
    if !issues.is_empty() {
        lines.push(String::new());
        lines.push("Notes:".to_string());
        lines.extend(issues.into_iter().map(|i| format!("  {}", i)));
    }
    lines.join("\n")
}

/// Every recommendation with untruncated fields
pub fn render_detailed(feed: &[Recommendation]) -> String {
    if feed.is_empty() {
        return "No recommendations to display.".to_string();
    }

    let mut lines = vec![
        rule('=', 80),
        "DETAILED RECOMMENDATIONS VIEW".to_string(),
        rule('=', 80),
    ];
    for (i, rec) in feed.iter().enumerate() {
        lines.push(String::new());
        lines.push(format!("#{}", i + 1));
        lines.push(format!("Title: {}", rec.title));
        lines.push(format!("Algorithm: {}", rec.algorithm));
        lines.push(format!("Source: {}", rec.source));
        lines.push(format!("Score: {:.3}", rec.score));
        if !rec.description.is_empty() {
            lines.push(format!("Description: {}", rec.description));
        }
        if let Some(published) = &rec.published_at {
            lines.push(format!("Published: {}", published));
        }
        if rec.has_link() {
            lines.push(format!("URL: {}", rec.url));
        }
        lines.push(rule('-', 40));
    }
    lines.join("\n")
}

/// Everything produced by one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub profile: Profile,
    pub weights: WeightDistribution,
    pub recommendations: Vec<Recommendation>,
}

impl Snapshot {
    pub fn new(
        profile: Profile,
        weights: WeightDistribution,
        recommendations: Vec<Recommendation>,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            profile,
            weights,
            recommendations,
        }
    }

    /// Only alphanumerics, `-` and `_` survive from the profile name
    fn file_stem(&self) -> String {
        let name: String = self
            .profile
            .name()
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        format!(
            "recommendation_analysis_{}_{}",
            name,
            self.generated_at.format("%Y%m%d_%H%M%S")
        )
    }

    /// The plain-text export body
    pub fn render_text(&self) -> String {
        let mut lines = vec![
            "REVERSE-INFERENCE RECOMMENDATION SYSTEM ANALYSIS".to_string(),
            rule('=', 80),
            String::new(),
            "CHARACTER PROFILE:".to_string(),
            rule('-', 40),
            format!("Name: {}", self.profile.name()),
        ];
        lines.extend(profile_lines(&self.profile));
        lines.push(String::new());

        lines.push("ALGORITHM INFERENCE:".to_string());
        lines.push(rule('-', 40));
        for (strategy, weight) in self.weights.ranked() {
            lines.push(format!("{}: {}", weight_label(strategy), percent(weight)));
        }
        lines.push(String::new());

        lines.push("RECOMMENDATIONS:".to_string());
        lines.push(rule('-', 40));
        for (i, rec) in self.recommendations.iter().enumerate() {
            lines.push(format!("{}. {}", i + 1, rec.title));
            lines.push(format!("   Algorithm: {}", rec.algorithm));
            lines.push(format!("   Source: {}", rec.source));
            lines.push(format!("   Score: {:.3}", rec.score));
            if !rec.description.is_empty() {
                lines.push(format!("   Description: {}", rec.description));
            }
            if rec.has_link() {
                lines.push(format!("   URL: {}", rec.url));
            }
            lines.push(String::new());
        }
        lines.join("\n")
    }
}

fn write_file(dir: &Path, file_name: String, body: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    let path = dir.join(file_name);
    fs::write(&path, body).map_err(|e| Error::io(&path, e))?;
    info!("📝 Results exported to {}", path.display());
    Ok(path)
}

/// Write the text report into `dir`, returning the file path
pub fn export_text(dir: &Path, snapshot: &Snapshot) -> Result<PathBuf> {
    write_file(
        dir,
        format!("{}.txt", snapshot.file_stem()),
        &snapshot.render_text(),
    )
}

/// Write the snapshot as pretty JSON into `dir`, returning the file path
pub fn export_json(dir: &Path, snapshot: &Snapshot) -> Result<PathBuf> {
    let body = serde_json::to_string_pretty(snapshot)?;
    write_file(dir, format!("{}.json", snapshot.file_stem()), &body)
}

pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let body = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(serde_json::from_str(&body)?)
}
