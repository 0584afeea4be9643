// src/playlist/aggregate.rs

//! Playlist bucketing.
//!
//! One global group holds every talk in crawl order (oldest requested year
//! first), so the archive reads chronologically. Per-speaker and per-topic
//! groups are prepended instead, so those lists read most-recent-first. The
//! asymmetry is intentional.

use std::collections::BTreeMap;

use crate::models::{PlaylistEntry, Talk};

/// Group name for the all-talks archive playlist.
pub const ALL_TALKS_GROUP: &str = "Conferences/GC-All";

/// Group name for one speaker's playlist.
pub fn speaker_group(speaker: &str) -> String {
    format!("Speakers/GC-S-{speaker}")
}

/// Group name for one topic's playlist.
pub fn topic_group(topic: &str) -> String {
    format!("Topics/GC-T-{topic}")
}

/// Mapping from playlist group name to its ordered entries.
#[derive(Debug, Default)]
pub struct PlaylistSet {
    groups: BTreeMap<String, Vec<PlaylistEntry>>,
}

impl PlaylistSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-register every group a talk could land in, so stale playlist
    /// files are replaced even when the group collects no entries this run.
    pub fn register(&mut self, talk: &Talk) {
        self.groups.entry(ALL_TALKS_GROUP.to_string()).or_default();
        self.groups.entry(speaker_group(&talk.speaker)).or_default();
        for topic in &talk.topics {
            self.groups.entry(topic_group(topic)).or_default();
        }
    }

    /// File a confirmed entry into the talk's groups.
    ///
    /// Procedural items stay out of speaker bucketing only; a tagged one
    /// still lands in its topic groups.
    pub fn add(&mut self, talk: &Talk, entry: PlaylistEntry) {
        self.groups
            .entry(ALL_TALKS_GROUP.to_string())
            .or_default()
            .push(entry.clone());

        for topic in &talk.topics {
            self.groups
                .entry(topic_group(topic))
                .or_default()
                .insert(0, entry.clone());
        }

        if talk.is_procedural() {
            return;
        }
        self.groups
            .entry(speaker_group(&talk.speaker))
            .or_default()
            .insert(0, entry);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PlaylistEntry])> {
        self.groups
            .iter()
            .map(|(name, entries)| (name.as_str(), entries.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::{Conference, Session};

    fn talk(title: &str, speaker: &str, topics: &[&str], year: u16) -> Talk {
        let conference = Arc::new(Conference {
            link: "/c".to_string(),
            title: format!("April {year}"),
            year,
            month: 4,
        });
        let session = Arc::new(Session {
            conference,
            link: "/s".to_string(),
            title: "Session".to_string(),
            number: 10,
        });
        Talk {
            session,
            link: "/t".to_string(),
            title: title.to_string(),
            speaker: speaker.to_string(),
            topics: topics.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn entry(title: &str, year: u16) -> PlaylistEntry {
        PlaylistEntry {
            duration_secs: 600,
            path: format!("../MP3/{year}/April/10-Session/{title}.mp3"),
            title: title.to_string(),
            year: Some(year),
        }
    }

    fn entries<'a>(set: &'a PlaylistSet, group: &str) -> Vec<&'a str> {
        set.iter()
            .find(|(name, _)| *name == group)
            .map(|(_, entries)| entries.iter().map(|e| e.title.as_str()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn global_appends_speaker_and_topic_prepend() {
        let mut set = PlaylistSet::new();
        let older = talk("First", "John Doe", &["Faith"], 1990);
        let newer = talk("Second", "John Doe", &["Faith"], 2020);

        set.add(&older, entry("First", 1990));
        set.add(&newer, entry("Second", 2020));

        assert_eq!(entries(&set, ALL_TALKS_GROUP), vec!["First", "Second"]);
        assert_eq!(
            entries(&set, &speaker_group("John Doe")),
            vec!["Second", "First"]
        );
        assert_eq!(entries(&set, &topic_group("Faith")), vec!["Second", "First"]);
    }

    #[test]
    fn procedural_talks_skip_speaker_bucket_only() {
        let mut set = PlaylistSet::new();
        let procedural = talk(
            "Sustaining of General Authorities",
            "Jane Roe",
            &["Church Governance"],
            2020,
        );
        set.register(&procedural);
        set.add(&procedural, entry("Sustaining of General Authorities", 2020));

        assert!(
            entries(&set, &speaker_group("Jane Roe")).is_empty(),
            "procedural item must not reach the speaker bucket"
        );
        assert_eq!(
            entries(&set, &topic_group("Church Governance")),
            vec!["Sustaining of General Authorities"]
        );
        assert_eq!(entries(&set, ALL_TALKS_GROUP).len(), 1);
    }

    #[test]
    fn register_creates_empty_groups() {
        let mut set = PlaylistSet::new();
        set.register(&talk("A Talk", "John Doe", &["Faith"], 2020));

        let names: Vec<_> = set.iter().map(|(name, _)| name.to_string()).collect();
        assert!(names.contains(&ALL_TALKS_GROUP.to_string()));
        assert!(names.contains(&speaker_group("John Doe")));
        assert!(names.contains(&topic_group("Faith")));
        assert!(set.iter().all(|(_, entries)| entries.is_empty()));
    }
}
