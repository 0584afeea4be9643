// src/services/topics.rs

//! Topic catalog crawler and the (title, speaker) join index.
//!
//! This traversal is independent of the conference crawl and is skipped
//! entirely when playlist generation is disabled; talks then carry an empty
//! topic list.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::{Config, TalkByTopic, Topic};
use crate::progress::ProgressReporter;
use crate::services::DocumentSource;
use crate::utils::text;

static TOPIC_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)<a[^>]*href="([^"]*)"[^>]*><div[^>]*><div[^>]*><div[^>]*><h4[^>]*>([^<]*)</h4></div></div></div><hr[^>]*></a>"#,
    )
    .expect("valid topic entry pattern")
});

static TOPIC_TALK_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)<a href="([^"]*)"[^>]*><div[^>]*><div[^>]*><div[^>]*><div[^>]*><h6[^>]*>[^>]*><h6[^>]*>([^<]*)</h6></div></div><div[^>]*><h4[^>]*>([^<]*)</h4>"#,
    )
    .expect("valid topic talk pattern")
});

/// Precomputed join index from (cleaned title, speaker) to topic names.
///
/// Matching is exact and case-sensitive; titles on both sides have gone
/// through the same cleaning transform.
#[derive(Debug, Default)]
pub struct TopicIndex {
    map: HashMap<(String, String), Vec<String>>,
}

impl TopicIndex {
    /// Index with no associations; every lookup yields an empty list.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the index from association records, preserving record order
    /// within each key.
    pub fn from_records(records: Vec<TalkByTopic>) -> Self {
        let mut map: HashMap<(String, String), Vec<String>> = HashMap::new();
        for record in records {
            map.entry((record.title, record.speaker))
                .or_default()
                .push(record.topic);
        }
        Self { map }
    }

    /// Topic names associated with one (title, speaker) pair.
    pub fn topics_for(&self, title: &str, speaker: &str) -> Vec<String> {
        self.map
            .get(&(title.to_string(), speaker.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Crawler over the topic catalog.
pub struct TopicIndexer<'a> {
    config: &'a Config,
    source: &'a dyn DocumentSource,
}

impl<'a> TopicIndexer<'a> {
    pub fn new(config: &'a Config, source: &'a dyn DocumentSource) -> Self {
        Self { config, source }
    }

    /// Discover every topic listed in the topic catalog.
    pub async fn discover_topics(&self) -> Vec<Topic> {
        let html = self
            .source
            .fetch(&self.config.topic_index_url(), self.config.keep_cache)
            .await;

        TOPIC_ENTRY
            .captures_iter(&html)
            .map(|caps| Topic {
                link: caps[1].to_string(),
                name: caps[2].to_string(),
            })
            .collect()
    }

    /// Crawl every topic page and build the join index.
    pub async fn build_index(&self, progress: &dyn ProgressReporter) -> TopicIndex {
        let topics = self.discover_topics().await;

        progress.start(topics.len() as u64, "topics");
        progress.announce("Retrieving talks for every topic");

        let mut records = Vec::new();
        for topic in &topics {
            if !progress.is_running() {
                break;
            }
            progress.set_description(&topic.name);

            let html = self
                .source
                .fetch(&self.config.absolute_url(&topic.link), self.config.keep_cache)
                .await;
            records.extend(extract_talks_by_topic(&html, &topic.name));

            progress.advance(1);
        }
        progress.finish();

        TopicIndex::from_records(records)
    }
}

/// Association records from one topic document.
fn extract_talks_by_topic(html: &str, topic: &str) -> Vec<TalkByTopic> {
    TOPIC_TALK_ENTRY
        .captures_iter(html)
        .map(|caps| TalkByTopic {
            link: caps[1].to_string(),
            speaker: caps[2].to_string(),
            title: text::clean_title(&caps[3]),
            topic: topic.to_string(),
        })
        .collect()
}
