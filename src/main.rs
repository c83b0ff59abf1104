//! Command line entry point for podium-elo
//!
//! Rates a range of seasons against the results API, caching each finished
//! season on disk, and writes the combined rating history as CSV.

use anyhow::{Context, Result};
use clap::Parser;
use podium_elo::cache::{FileSeasonCache, InMemorySeasonCache, SeasonCache};
use podium_elo::config::AppConfig;
use podium_elo::provider::HttpResultProvider;
use podium_elo::rating::SeasonRangeAggregator;
use podium_elo::SeasonId;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Podium Elo - season-chained pairwise Elo ratings for racing drivers
#[derive(Parser)]
#[command(
    name = "podium-elo",
    version,
    about = "Compute pairwise Elo rating histories from race finishing positions",
    long_about = "Podium Elo rates every driver against every other driver in each race they \
                 both finished, one season at a time, carrying each driver's final rating into \
                 the next season. Finished seasons are cached so reruns are cheap."
)]
struct Args {
    /// First season to rate
    #[arg(short, long, value_name = "YEAR")]
    start: SeasonId,

    /// Last season to rate (inclusive), defaults to the first
    #[arg(short, long, value_name = "YEAR")]
    end: Option<SeasonId>,

    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// K-factor override
    #[arg(short, long, value_name = "K")]
    k_factor: Option<f64>,

    /// Default initial rating override
    #[arg(long, value_name = "RATING")]
    initial_rating: Option<f64>,

    /// Cache directory override
    #[arg(long, value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    /// Keep the cache in memory only
    #[arg(long, help = "Do not read or write cached seasons on disk")]
    no_cache: bool,

    /// Output CSV path
    #[arg(short, long, value_name = "FILE", help = "Write ratings here instead of stdout")]
    output: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Dry run mode (validate config and exit)
    #[arg(long, help = "Validate configuration and exit without rating anything")]
    dry_run: bool,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Display startup banner with run information
fn display_startup_banner(config: &AppConfig, start: SeasonId, end: SeasonId) {
    info!("Podium Elo");
    info!("   Seasons: {}..={}", start, end);
    info!("   K-factor: {}", config.rating.k_factor);
    info!("   Initial rating: {}", config.rating.initial_rating);
    info!("   Update mode: {}", config.rating.update_mode);
    info!("   Calendar policy: {}", config.rating.calendar_policy);
    if config.cache.enabled {
        info!("   Cache: {}", config.cache.dir.display());
    } else {
        info!("   Cache: memory only");
    }
    info!("   Provider: {}", config.provider.base_url);
}

/// Load and merge configuration from file/environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    // Apply CLI overrides
    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    if let Some(k_factor) = args.k_factor {
        config.rating.k_factor = k_factor;
    }

    if let Some(initial_rating) = args.initial_rating {
        config.rating.initial_rating = initial_rating;
    }

    if let Some(cache_dir) = &args.cache_dir {
        config.cache.dir = cache_dir.clone();
    }

    if args.no_cache {
        config.cache.enabled = false;
    }

    podium_elo::config::validate_config(&config)?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {:#}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let end = args.end.unwrap_or(args.start);
    display_startup_banner(&config, args.start, end);

    if args.dry_run {
        info!("Configuration validation successful");
        info!("Dry run completed - exiting without rating");
        return Ok(());
    }

    let provider = Arc::new(HttpResultProvider::new(
        config.provider.base_url.clone(),
        config.provider_timeout(),
    )?);
    let cache: Arc<dyn SeasonCache> = if config.cache.enabled {
        Arc::new(FileSeasonCache::new(config.cache.dir.clone()))
    } else {
        Arc::new(InMemorySeasonCache::new())
    };

    let aggregator = SeasonRangeAggregator::new(config.rating.clone(), provider, cache)?;
    let ratings = aggregator.run_range(args.start, end)?;

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            ratings.write_csv(BufWriter::new(file))?;
            info!("Wrote {} rows to {}", ratings.len(), path.display());
        }
        None => ratings.write_csv(io::stdout().lock())?,
    }

    Ok(())
}
