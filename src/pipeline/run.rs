// src/pipeline/run.rs

//! Pipeline orchestration.
//!
//! Stages run in a fixed order: conference discovery, the topic crawl (when
//! playlists are enabled), talk collection, audio retrieval, playlist
//! serialization, cache cleanup. Cancellation is polled between units of
//! work inside each stage; playlists for everything gathered so far are
//! still written, and only cache cleanup is skipped, so a cancelled run
//! resumes cheaply.

use std::path::Path;
use std::sync::Arc;

use tokio::fs;

use crate::error::Result;
use crate::models::{Audio, Conference, Config, PlaylistEntry, Talk};
use crate::playlist::{PlaylistSet, PlaylistWriter};
use crate::progress::ProgressReporter;
use crate::services::{
    CatalogCrawler, MediaSource, SessionExtractor, TopicIndex, TopicIndexer, resolve_audio, tagger,
};
use crate::storage::DocumentCache;
use crate::utils::paths;

/// One end-to-end mirroring run.
pub struct Pipeline<'a> {
    config: &'a Config,
    source: &'a dyn MediaSource,
    cache: &'a DocumentCache,
    progress: &'a dyn ProgressReporter,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a Config,
        source: &'a dyn MediaSource,
        cache: &'a DocumentCache,
        progress: &'a dyn ProgressReporter,
    ) -> Self {
        Self {
            config,
            source,
            cache,
            progress,
        }
    }

    pub async fn run(&self) -> Result<()> {
        let crawler = CatalogCrawler::new(self.config, self.source);
        let conferences = crawler.discover_conferences().await;
        if conferences.is_empty() {
            log::warn!("No conferences found in the requested year range");
            return Ok(());
        }

        let topics = if self.config.no_playlists {
            TopicIndex::empty()
        } else {
            TopicIndexer::new(self.config, self.source)
                .build_index(self.progress)
                .await
        };

        let talks = self.collect_talks(&conferences, &topics).await;

        let mut playlists = PlaylistSet::new();
        if !self.config.no_playlists {
            for talk in &talks {
                playlists.register(talk);
            }
        }

        self.retrieve_audio(&talks, &mut playlists).await?;

        if !self.config.no_playlists {
            PlaylistWriter::new(self.config).write_all(&playlists, self.progress)?;
        }

        // A cancelled run keeps its cache so the next run can resume from it
        if !self.config.keep_cache && self.progress.is_running() {
            self.cache.clear().await?;
        }
        Ok(())
    }

    /// Walk every conference document and collect its talks in order.
    async fn collect_talks(&self, conferences: &[Conference], topics: &TopicIndex) -> Vec<Talk> {
        self.progress.start(conferences.len() as u64, "conferences");
        self.progress
            .announce("Retrieving all conference sessions and talk links");

        let extractor = SessionExtractor::new(topics);
        let mut talks = Vec::new();
        for conference in conferences {
            if !self.progress.is_running() {
                break;
            }
            self.progress.set_description(&conference.title);

            let html = self
                .source
                .fetch(
                    &self.config.absolute_url(&conference.link),
                    self.config.keep_cache,
                )
                .await;

            let conference = Arc::new(conference.clone());
            for session in extractor.extract_sessions(&html, &conference) {
                talks.extend(session.talks);
            }
            self.progress.advance(1);
        }
        self.progress.finish();
        talks
    }

    /// Resolve, download, tag, and file every talk's audio.
    async fn retrieve_audio(&self, talks: &[Talk], playlists: &mut PlaylistSet) -> Result<()> {
        self.progress.start(talks.len() as u64, "talks");
        self.progress.announce(if self.config.no_playlists {
            "Retrieving talk audio files"
        } else {
            "Retrieving talk audio files and updating playlists"
        });

        let output_root = paths::output_dir(self.config);
        for talk in talks {
            if !self.progress.is_running() {
                break;
            }
            self.progress.set_description(&talk.title);

            let html = self
                .source
                .fetch(&self.config.absolute_url(&talk.link), false)
                .await;
            let Some(audio) = resolve_audio(&html) else {
                // Musical numbers and the like have no recording of their own
                log::info!("No audio recording for: {}", talk.title);
                self.progress.advance(1);
                continue;
            };

            let relative = paths::relative_media_path(&talk.session, self.config.no_numbers);
            let file_path = output_root.join(&relative).join(&audio.file);

            if self.ensure_audio(&file_path, &audio).await? {
                if let Err(e) = tagger::stamp_tags(&file_path, talk, self.config) {
                    log::warn!("Tagging failed for {}: {}", file_path.display(), e);
                }
                if !self.config.no_playlists {
                    let duration_secs = tagger::read_duration(&file_path).unwrap_or_default();
                    playlists.add(
                        talk,
                        PlaylistEntry {
                            duration_secs,
                            path: format!("../{relative}/{}", audio.file),
                            title: talk.title.clone(),
                            year: Some(talk.session.conference.year),
                        },
                    );
                }
            }
            self.progress.advance(1);
        }
        self.progress.finish();
        Ok(())
    }

    /// Make sure the audio file exists on disk.
    ///
    /// Returns false when the download failed; the talk is skipped and the
    /// run continues. A failed write of already-downloaded bytes aborts the
    /// run after removing the partial file.
    async fn ensure_audio(&self, path: &Path, audio: &Audio) -> Result<bool> {
        if path.exists() {
            log::debug!("Already downloaded: {}", path.display());
            return Ok(true);
        }

        let bytes = match self.source.download_bytes(&audio.link).await {
            Ok(bytes) => bytes,
            Err(e) => {
                log::error!("Download failed ({}): {}", audio.link, e);
                return Ok(false);
            }
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        if let Err(e) = fs::write(path, &bytes).await {
            let _ = fs::remove_file(path).await;
            return Err(e.into());
        }
        log::debug!("Downloaded: {}", path.display());
        Ok(true)
    }
}
