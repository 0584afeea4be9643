// src/models/playlist.rs

//! Playlist line items.

/// One line item in an output playlist group.
///
/// Created only after the talk's audio is confirmed present on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    /// Playback duration in whole seconds
    pub duration_secs: u64,

    /// Media path relative to the playlist directory
    pub path: String,

    /// Cleaned talk title
    pub title: String,

    /// Conference year, when the group carries year metadata
    pub year: Option<u16>,
}
