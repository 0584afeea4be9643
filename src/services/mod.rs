// src/services/mod.rs

//! Crawl, extraction, and media services.
//!
//! Each document type the source publishes has one extractor here; the
//! fragile markup concern stays inside this module and only typed records
//! leave it.

pub mod audio;
pub mod catalog;
pub mod fetcher;
pub mod sessions;
pub mod tagger;
pub mod topics;

pub use audio::resolve_audio;
pub use catalog::CatalogCrawler;
pub use fetcher::{DocumentSource, MediaSource, PageFetcher};
pub use sessions::{SessionExtractor, SessionTalks};
pub use topics::{TopicIndex, TopicIndexer};
