// src/playlist/write.rs

//! Playlist serialization.
//!
//! Each group becomes a single `.m3u` file named
//! `{group}-({summary}).m3u`, where the summary encodes the year span,
//! entry count, and total duration. Because the summary changes between
//! runs, prior files for the group are deleted by base name before writing.

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::models::{Config, PlaylistEntry};
use crate::playlist::PlaylistSet;
use crate::progress::ProgressReporter;
use crate::utils::{paths, text};

/// Writer for aggregated playlist groups.
pub struct PlaylistWriter<'a> {
    config: &'a Config,
}

impl<'a> PlaylistWriter<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Serialize every group in the set.
    ///
    /// Runs to completion even under cancellation: entries already
    /// aggregated describe files confirmed on disk, and losing them would
    /// cost a full re-aggregation on the next run.
    pub fn write_all(&self, set: &PlaylistSet, progress: &dyn ProgressReporter) -> Result<()> {
        progress.start(set.len() as u64, "playlists");
        progress.announce("Writing playlists");

        for (name, entries) in set.iter() {
            progress.set_description(name);
            self.write_group(name, entries)?;
            progress.advance(1);
        }
        progress.finish();
        Ok(())
    }

    /// Serialize one group, replacing any prior output for it.
    ///
    /// Empty groups and speaker groups below the configured minimum entry
    /// count produce no file (but still clear prior output).
    pub fn write_group(&self, name: &str, entries: &[PlaylistEntry]) -> Result<()> {
        let full = paths::output_dir(self.config).join(name);
        let (Some(dir), Some(base)) = (full.parent(), full.file_name()) else {
            return Ok(());
        };
        let base = base.to_string_lossy().into_owned();

        remove_existing(dir, &base)?;

        if entries.is_empty() {
            return Ok(());
        }
        if name.starts_with("Speakers/") && entries.len() < self.config.speaker_min {
            return Ok(());
        }

        let path = dir.join(format!("{base}-({}).m3u", summary_text(entries)));
        log::debug!("Writing playlist: {}", path.display());

        let mut body = String::from("#EXTM3U\n\n");
        for entry in entries {
            body.push_str(&format!(
                "#EXTINF:{}, {}\n",
                text::duration_text(entry.duration_secs),
                entry.title
            ));
            // Players on the target platform expect backslash separators
            body.push_str(&entry.path.replace('/', "\\"));
            body.push_str("\n\n");
        }

        fs::create_dir_all(dir)?;
        fs::write(&path, body)?;
        Ok(())
    }
}

/// Delete prior playlist files for a group's base name.
fn remove_existing(dir: &Path, base: &str) -> Result<()> {
    let Ok(listing) = fs::read_dir(dir) else {
        // Directory not created yet: nothing to replace
        return Ok(());
    };

    let prefix = format!("{base}-(");
    for entry in listing {
        let entry = entry?;
        let file_name = entry.file_name();
        let file_name = file_name.to_string_lossy();
        if file_name.starts_with(&prefix) && file_name.ends_with(".m3u") {
            fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}

/// Summary suffix: `{firstYear}-{lastYear}, {count}, {durationText}` when
/// year metadata is present, `{count}, {durationText}` otherwise.
fn summary_text(entries: &[PlaylistEntry]) -> String {
    let count = entries.len();
    let total: u64 = entries.iter().map(|e| e.duration_secs).sum();
    let duration = text::duration_text(total);

    let first = entries.first().and_then(|e| e.year);
    let last = entries.last().and_then(|e| e.year);
    match (first, last) {
        (Some(first), Some(last)) => format!("{first}-{last}, {count}, {duration}"),
        _ => format!("{count}, {duration}"),
    }
}
