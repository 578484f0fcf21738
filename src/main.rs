//! FeedLens Engine
//!
//! Runs one reverse-inference analysis: which recommendation strategies would a
//! platform lean on for this user, and what would a feed blended from them look like.
//!
//! # Usage
//!
//! ```text
//! feedlens-engine [PROFILE_JSON]
//! ```
//!
//! Without an argument the built-in sample profile is analysed. Configuration
//! comes from the environment (and `.env`); see [`feedlens::config`].

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use feedlens::config::Config;
use feedlens::error::{Error, Result};
use feedlens::profile::Profile;
use feedlens::recommendation::{FeedComposer, InferenceEngine};
use feedlens::report::{self, Snapshot};
use feedlens::sources::{AggregatorClient, NewsClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("═══════════════════════════════════════════════════════════════");
    info!("  🔎 FeedLens Engine v{}", env!("CARGO_PKG_VERSION"));
    info!("═══════════════════════════════════════════════════════════════");

    if let Err(e) = run().await {
        error!("❌ Analysis failed [{}]: {}", e.error_code(), e);
        return Err(e.into());
    }

    info!("👋 Done");
    Ok(())
}

async fn run() -> Result<()> {
    let config = Config::from_env()?;
    info!("✅ Configuration loaded and validated");

    let profile = match std::env::args().nth(1) {
        Some(path) => load_profile(Path::new(&path))?,
        None => {
            info!("No profile file given, using the sample profile");
            Profile::sample()
        }
    };

    let mut rng = match config.feed.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    if config.news.api_key.is_none() {
        warn!("⚠️ NEWS_API_KEY not set, news content will be placeholders");
    }
    let composer = FeedComposer::new(
        Arc::new(NewsClient::new(&config.news)?),
        Arc::new(AggregatorClient::new(&config.aggregator)?),
    );

    println!("{}", report::render_profile(&profile));

    let weights = InferenceEngine::default().infer(&profile, &mut rng);
    println!("\n{}", report::render_weights(&weights));

    info!("🔄 Fetching content for {} items...", config.feed.target_size);
    let feed = composer
        .compose(&profile, &weights, config.feed.target_size, &mut rng)
        .await;

    println!("\n{}", report::render_feed(&feed));
    println!("\n{}", report::render_summary(&profile, &feed));

    if let Some(dir) = &config.feed.export_dir {
        let snapshot = Snapshot::new(profile, weights, feed);
        report::export_text(dir, &snapshot)?;
        report::export_json(dir, &snapshot)?;
    }

    Ok(())
}

fn load_profile(path: &Path) -> Result<Profile> {
    let body = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let profile: Profile = serde_json::from_str(&body)?;
    info!("👤 Loaded profile '{}' from {}", profile.name(), path.display());
    Ok(profile)
}

/// Initialize tracing with structured logging
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("feedlens=debug,feedlens_engine=debug,info"));

    let registry = tracing_subscriber::registry().with(filter);

    if std::env::var("LOG_FORMAT").map_or(false, |f| f.eq_ignore_ascii_case("json")) {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .with_ansi(std::env::var("NO_COLOR").is_err()),
            )
            .init();
    }
}
