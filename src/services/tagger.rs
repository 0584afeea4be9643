// src/services/tagger.rs

//! Audio tag stamping and duration probing.
//!
//! Invoked only after a file has been written to disk. Albums use a rolling
//! window: talks within the most recent years keep a per-conference album,
//! older talks collapse into one aggregate album so players don't drown in
//! decades of two-session albums.

use std::path::Path;

use lofty::config::WriteOptions;
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::{Accessor, ItemKey, Tag};

use crate::error::{AppError, Result};
use crate::models::{Config, Talk};

/// Fixed publisher credited on every file.
pub const PUBLISHER: &str = "The Church of Jesus Christ of Latter-day Saints";

/// Width of the per-conference album window, in years.
const RELEVANT_YEARS: u16 = 5;

/// Album label for a talk from the given conference year and month.
pub fn album_label(config: &Config, year: u16, month: u8) -> String {
    if year < config.max_year.saturating_sub(RELEVANT_YEARS) {
        format!(
            "GC {}-{}",
            config.max_year - RELEVANT_YEARS,
            config.min_year
        )
    } else {
        format!("GC {year}-{month:02}")
    }
}

/// Stamp title, album, and publisher fields onto a downloaded audio file.
pub fn stamp_tags(path: &Path, talk: &Talk, config: &Config) -> Result<()> {
    let mut tagged = Probe::open(path)
        .map_err(AppError::tag)?
        .read()
        .map_err(AppError::tag)?;

    if tagged.primary_tag().is_none() {
        tagged.insert_tag(Tag::new(tagged.primary_tag_type()));
    }
    let Some(tag) = tagged.primary_tag_mut() else {
        return Err(AppError::tag("no writable tag"));
    };

    let conference = &talk.session.conference;
    tag.set_title(talk.title.clone());
    tag.set_album(album_label(config, conference.year, conference.month));
    tag.insert_text(ItemKey::AlbumArtist, PUBLISHER.to_string());
    tag.insert_text(ItemKey::Composer, PUBLISHER.to_string());
    tag.insert_text(ItemKey::Publisher, PUBLISHER.to_string());

    tagged
        .save_to_path(path, WriteOptions::default())
        .map_err(AppError::tag)?;
    Ok(())
}

/// Playback duration of an audio file, in whole seconds.
pub fn read_duration(path: &Path) -> Result<u64> {
    let tagged = Probe::open(path)
        .map_err(AppError::tag)?
        .read()
        .map_err(AppError::tag)?;
    Ok(tagged.properties().duration().as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        let mut config = Config::default();
        config.min_year = 1971;
        config.max_year = 2024;
        config
    }

    #[test]
    fn recent_talks_get_per_conference_album() {
        let config = config();
        assert_eq!(album_label(&config, 2024, 4), "GC 2024-04");
        assert_eq!(album_label(&config, 2019, 10), "GC 2019-10");
    }

    #[test]
    fn old_talks_collapse_into_aggregate_album() {
        let config = config();
        assert_eq!(album_label(&config, 2018, 4), "GC 2019-1971");
        assert_eq!(album_label(&config, 1971, 10), "GC 2019-1971");
    }
}
