// src/playlist/mod.rs

//! Playlist bucketing and serialization.

mod aggregate;
mod write;

pub use aggregate::{ALL_TALKS_GROUP, PlaylistSet, speaker_group, topic_group};
pub use write::PlaylistWriter;
