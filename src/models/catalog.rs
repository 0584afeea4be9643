// src/models/catalog.rs

//! Records produced while walking the conference catalog.
//!
//! All locators are relative paths; they are resolved against the configured
//! origin only at fetch time.

use std::sync::Arc;

/// One discrete conference event in a given year and month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conference {
    /// Relative locator of the conference document
    pub link: String,

    /// Display title as listed in the catalog (e.g. "April 2020")
    pub title: String,

    pub year: u16,
    pub month: u8,
}

/// An ordered grouping of talks within a conference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Owning conference
    pub conference: Arc<Conference>,

    /// Relative locator of the session document
    pub link: String,

    /// Display title
    pub title: String,

    /// Ordinal number: 10 × 1-based document position, leaving gaps for
    /// manual reordering
    pub number: u32,
}

/// A single recorded address, the unit of download and playlist membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Talk {
    /// Owning session
    pub session: Arc<Session>,

    /// Relative locator of the talk detail document
    pub link: String,

    /// Cleaned title (markup stripped, restricted character set)
    pub title: String,

    /// Speaker name exactly as listed
    pub speaker: String,

    /// Topic names joined from the topic index by (title, speaker)
    pub topics: Vec<String>,
}

impl Talk {
    /// Whether this talk is a procedural item (sustainings, audit reports)
    /// rather than an address. Procedural items are kept out of the
    /// session-ordered working set and out of speaker playlists.
    pub fn is_procedural(&self) -> bool {
        is_procedural_title(&self.title)
    }
}

/// Procedural-item check on a cleaned title.
pub fn is_procedural_title(title: &str) -> bool {
    title.contains("Sustaining of") || title.starts_with("Church Auditing")
}

/// A subject-matter category from the topic catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    /// Relative locator of the topic document
    pub link: String,

    /// Display name
    pub name: String,
}

/// Association record from the topic catalog, keyed by (title, speaker).
///
/// Consumed only for the join against session-ordered talks and discarded
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TalkByTopic {
    pub link: String,
    pub speaker: String,

    /// Cleaned identically to `Talk::title`
    pub title: String,

    pub topic: String,
}

/// Resolved media location for one talk. Ephemeral; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Audio {
    /// Download location (absolute for the direct pattern, as found in the
    /// decoded page state for the fallback)
    pub link: String,

    /// Target filename derived from the locator, language suffix stripped
    pub file: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn procedural_titles_detected() {
        assert!(is_procedural_title("The Sustaining of Church Officers"));
        assert!(is_procedural_title("Church Auditing Department Report 2020"));
        assert!(!is_procedural_title("A Regular Address"));
        // Prefix rule only applies to audit reports
        assert!(!is_procedural_title("Report of the Church Auditing Dept"));
    }
}
