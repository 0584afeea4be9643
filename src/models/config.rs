// src/models/config.rs

//! Application configuration structures.
//!
//! The configuration record is constructed once by the CLI layer and passed
//! by reference into every core operation; nothing in the pipeline mutates
//! it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Language code for the catalog (e.g. "eng")
    #[serde(default = "defaults::language")]
    pub language: String,

    /// First year to mirror (inclusive)
    #[serde(default = "defaults::min_year")]
    pub start_year: u16,

    /// Last year to mirror (inclusive)
    #[serde(default = "defaults::max_year")]
    pub end_year: u16,

    /// Earliest year the archive covers
    #[serde(default = "defaults::min_year")]
    pub min_year: u16,

    /// Latest year the archive covers (the current year)
    #[serde(default = "defaults::max_year")]
    pub max_year: u16,

    /// Destination root for audio files and playlists
    #[serde(default = "defaults::dest_dir")]
    pub dest_dir: PathBuf,

    /// Root of the document cache
    #[serde(default = "defaults::cache_dir")]
    pub cache_dir: PathBuf,

    /// Minimum talk count for a speaker playlist to be written
    #[serde(default = "defaults::speaker_min")]
    pub speaker_min: usize,

    /// Skip playlist generation (and the topic crawl feeding it)
    #[serde(default)]
    pub no_playlists: bool,

    /// Keep the document cache after a successful run
    #[serde(default)]
    pub keep_cache: bool,

    /// Exclude ordinal prefixes from session folder names
    #[serde(default)]
    pub no_numbers: bool,

    /// HTTP behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.language.trim().is_empty() {
            return Err(AppError::validation("language is empty"));
        }
        if self.start_year > self.end_year {
            return Err(AppError::validation("start_year is after end_year"));
        }
        if self.speaker_min == 0 {
            return Err(AppError::validation("speaker_min must be > 0"));
        }
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        Ok(())
    }

    /// Clamp the requested year range to the archive's bounds and swap a
    /// reversed range.
    pub fn normalize_years(&mut self) {
        self.start_year = self.start_year.clamp(self.min_year, self.max_year);
        self.end_year = self.end_year.clamp(self.min_year, self.max_year);
        if self.start_year > self.end_year {
            std::mem::swap(&mut self.start_year, &mut self.end_year);
        }
    }

    /// URL of the top-level conference catalog for the configured language.
    pub fn conference_index_url(&self) -> String {
        format!(
            "{}/study/general-conference?lang={}",
            self.crawler.origin, self.language
        )
    }

    /// URL of the topic catalog for the configured language.
    pub fn topic_index_url(&self) -> String {
        format!(
            "{}/study/general-conference/topics?lang={}",
            self.crawler.origin, self.language
        )
    }

    /// URL of the language listing document.
    pub fn languages_url(&self) -> String {
        format!("{}/languages", self.crawler.origin)
    }

    /// Resolve a relative, possibly percent-encoded locator against the
    /// origin.
    pub fn absolute_url(&self, link: &str) -> String {
        let decoded = urlencoding::decode(link)
            .map(|c| c.into_owned())
            .unwrap_or_else(|_| link.to_string());
        format!("{}{}", self.crawler.origin, decoded)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: defaults::language(),
            start_year: defaults::min_year(),
            end_year: defaults::max_year(),
            min_year: defaults::min_year(),
            max_year: defaults::max_year(),
            dest_dir: defaults::dest_dir(),
            cache_dir: defaults::cache_dir(),
            speaker_min: defaults::speaker_min(),
            no_playlists: false,
            keep_cache: false,
            no_numbers: false,
            crawler: CrawlerConfig::default(),
        }
    }
}

/// HTTP client behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// Origin all relative locators resolve against
    #[serde(default = "defaults::origin")]
    pub origin: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            origin: defaults::origin(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    use chrono::Datelike;

    pub fn language() -> String {
        "eng".into()
    }
    pub fn min_year() -> u16 {
        1971
    }
    pub fn max_year() -> u16 {
        chrono::Utc::now().year() as u16
    }
    pub fn dest_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Music")
    }
    pub fn cache_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".confmirror_cache")
    }
    pub fn speaker_min() -> usize {
        3
    }
    pub fn origin() -> String {
        "https://www.churchofjesuschrist.org".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; confmirror/1.0)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
}
