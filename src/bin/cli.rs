//! confmirror CLI
//!
//! Mirrors the conference audio archive into a local music library and
//! generates playlists grouped by conference, speaker, and topic.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use clap::Parser;
use confmirror::{
    error::{AppError, Result},
    models::Config,
    pipeline::Pipeline,
    progress::{ConsoleReporter, ProgressReporter, SilentReporter, cancel_flag},
    services::{CatalogCrawler, PageFetcher},
    storage::DocumentCache,
};

/// confmirror - General Conference audio mirror
#[derive(Parser, Debug)]
#[command(
    name = "confmirror",
    version,
    about = "Mirror conference audio and build playlists"
)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Language code of the catalog to mirror (e.g. eng, spa)
    #[arg(short, long)]
    lang: Option<String>,

    /// First conference year to mirror (inclusive)
    #[arg(long)]
    start: Option<u16>,

    /// Last conference year to mirror (inclusive)
    #[arg(long)]
    end: Option<u16>,

    /// Destination directory for audio files and playlists
    #[arg(short, long)]
    dest: Option<PathBuf>,

    /// Minimum talk count for a speaker playlist to be written
    #[arg(long)]
    speaker_min: Option<usize>,

    /// Skip playlist generation and the topic crawl feeding it
    #[arg(long)]
    no_playlists: bool,

    /// Keep the document cache after the run
    #[arg(long)]
    keep_cache: bool,

    /// Leave ordinal prefixes off session folder names
    #[arg(long)]
    no_numbers: bool,

    /// Enable verbose logging (replaces the progress bar)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Build the effective configuration: file (or defaults), then flag
    /// overrides, then year normalization.
    fn effective_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(lang) = &self.lang {
            config.language = lang.clone();
        }
        if let Some(start) = self.start {
            config.start_year = start;
        }
        if let Some(end) = self.end {
            config.end_year = end;
        }
        if let Some(dest) = &self.dest {
            config.dest_dir = dest.clone();
        }
        if let Some(speaker_min) = self.speaker_min {
            config.speaker_min = speaker_min;
        }
        config.no_playlists |= self.no_playlists;
        config.keep_cache |= self.keep_cache;
        config.no_numbers |= self.no_numbers;

        config.normalize_years();
        config.validate()?;
        Ok(config)
    }
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Reject a language code the catalog does not publish.
///
/// An unreachable language listing degrades to a warning so offline cached
/// runs still work.
async fn check_language(config: &Config, fetcher: &PageFetcher) -> Result<()> {
    let languages = CatalogCrawler::new(config, fetcher)
        .discover_languages()
        .await;

    if languages.is_empty() {
        log::warn!("Language listing unavailable, skipping language check");
        return Ok(());
    }
    if !languages.contains_key(&config.language) {
        let mut codes: Vec<_> = languages.keys().map(String::as_str).collect();
        codes.sort_unstable();
        return Err(AppError::validation(format!(
            "Unknown language '{}'. Available: {}",
            config.language,
            codes.join(", ")
        )));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.effective_config()?;
    log::info!(
        "Mirroring {}-{} ({}) into {}",
        config.start_year,
        config.end_year,
        config.language,
        config.dest_dir.display()
    );

    let cache = DocumentCache::new(&config.cache_dir, &config.language);
    let fetcher = PageFetcher::new(&config, cache)?;

    check_language(&config, &fetcher).await?;

    let cancelled = cancel_flag();
    let flag = Arc::clone(&cancelled);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Cancellation requested, finishing the current unit...");
            flag.store(true, Ordering::Relaxed);
        }
    });

    let progress: Box<dyn ProgressReporter> = if cli.verbose {
        Box::new(SilentReporter::new(Arc::clone(&cancelled)))
    } else {
        Box::new(ConsoleReporter::new(Arc::clone(&cancelled)))
    };

    Pipeline::new(&config, &fetcher, fetcher.cache(), progress.as_ref())
        .run()
        .await?;

    if cancelled.load(Ordering::Relaxed) {
        log::warn!("Run cancelled; partial results were kept");
        std::process::exit(2);
    }

    log::info!("Done!");
    Ok(())
}
