// src/models/mod.rs

//! Domain models for the archive mirror.
//!
//! Every record produced by the crawl is a plain immutable value type;
//! shared ownership between talks, sessions, and conferences goes through
//! `Arc` so the working set stays cheap to clone.

mod catalog;
mod config;
mod playlist;

// Re-export all public types
pub use catalog::{Audio, Conference, Session, Talk, TalkByTopic, Topic, is_procedural_title};
pub use config::{Config, CrawlerConfig};
pub use playlist::PlaylistEntry;
