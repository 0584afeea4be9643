// src/services/sessions.rs

//! Session and talk extraction from a conference document.
//!
//! Sessions are numbered 10, 20, 30, … in document order, leaving numeric
//! gaps for manual reordering. Talk titles go through the cleaning transform
//! and procedural items (sustainings, audit reports) are dropped before the
//! talk enters the working set. Topic associations are joined here so a talk
//! is complete the moment it is constructed.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::models::{Conference, Session, Talk, is_procedural_title};
use crate::services::TopicIndex;
use crate::utils::text;

static SESSION_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)<a[^>]*href="([^"]*)"[^>]*><div[^>]*><p><span[^>]*>([^<]*)</span></p></div></a><ul[^>]*>(.*?)</ul>"#,
    )
    .expect("valid session entry pattern")
});

static TALK_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)<a[^>]*href="([^"]*)"[^>]*><div[^>]*><p><span[^>]*>([^<]*)</span></p><p[^>]*>([^<]*)</p></div></a>"#,
    )
    .expect("valid talk entry pattern")
});

/// One extracted session with its ordered talks.
#[derive(Debug, Clone)]
pub struct SessionTalks {
    pub session: Arc<Session>,
    pub talks: Vec<Talk>,
}

/// Extractor for conference documents.
pub struct SessionExtractor<'a> {
    topics: &'a TopicIndex,
}

impl<'a> SessionExtractor<'a> {
    pub fn new(topics: &'a TopicIndex) -> Self {
        Self { topics }
    }

    /// Extract the ordered sessions (and their ordered talks) from one
    /// conference document.
    pub fn extract_sessions(
        &self,
        html: &str,
        conference: &Arc<Conference>,
    ) -> Vec<SessionTalks> {
        SESSION_ENTRY
            .captures_iter(html)
            .enumerate()
            .map(|(position, caps)| {
                let session = Arc::new(Session {
                    conference: Arc::clone(conference),
                    link: caps[1].to_string(),
                    title: caps[2].to_string(),
                    number: (position as u32 + 1) * 10,
                });
                let talks = self.extract_talks(&caps[3], &session);
                SessionTalks { session, talks }
            })
            .collect()
    }

    /// Talks within one session's list markup, in document order.
    fn extract_talks(&self, list_html: &str, session: &Arc<Session>) -> Vec<Talk> {
        TALK_ENTRY
            .captures_iter(list_html)
            .filter_map(|caps| {
                let title = text::clean_title(&caps[2]);
                if is_procedural_title(&title) {
                    return None;
                }
                let speaker = caps[3].to_string();
                let topics = self.topics.topics_for(&title, &speaker);
                Some(Talk {
                    session: Arc::clone(session),
                    link: caps[1].to_string(),
                    title,
                    speaker,
                    topics,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TalkByTopic;

    fn conference() -> Arc<Conference> {
        Arc::new(Conference {
            link: "/study/general-conference/2020/04?lang=eng".to_string(),
            title: "April 2020".to_string(),
            year: 2020,
            month: 4,
        })
    }

    fn session_block(link: &str, title: &str, talks: &str) -> String {
        format!(
            r#"<a class="s" href="{link}"><div class="w"><p><span class="t">{title}</span></p></div></a><ul class="list">{talks}</ul>"#
        )
    }

    fn talk_item(link: &str, title: &str, speaker: &str) -> String {
        format!(
            r#"<a class="k" href="{link}"><div class="w"><p><span class="t">{title}</span></p><p class="s">{speaker}</p></div></a>"#
        )
    }

    #[test]
    fn session_ordinals_are_multiples_of_ten() {
        let html = [
            session_block("/s1", "Saturday Morning Session", ""),
            session_block("/s2", "Saturday Afternoon Session", ""),
            session_block("/s3", "Sunday Morning Session", ""),
        ]
        .join("\n");

        let index = TopicIndex::empty();
        let extractor = SessionExtractor::new(&index);
        let sessions = extractor.extract_sessions(&html, &conference());

        let numbers: Vec<_> = sessions.iter().map(|s| s.session.number).collect();
        assert_eq!(numbers, vec![10, 20, 30]);
        assert_eq!(sessions[0].session.title, "Saturday Morning Session");
    }

    #[test]
    fn procedural_items_are_excluded() {
        let talks = [
            talk_item("/t1", "Faith &amp; Hope", "John Doe"),
            talk_item("/t2", "Sustaining of General Authorities", "Jane Roe"),
            talk_item("/t3", "Church Auditing Department Report 2020", "Jane Roe"),
            talk_item("/t4", "A Second Address", "Jane Roe"),
        ]
        .join("");
        let html = session_block("/s1", "Saturday Morning Session", &talks);

        let index = TopicIndex::empty();
        let extractor = SessionExtractor::new(&index);
        let sessions = extractor.extract_sessions(&html, &conference());

        let titles: Vec<_> = sessions[0].talks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Faith  Hope", "A Second Address"]);
    }

    #[test]
    fn topics_joined_by_title_and_speaker() {
        let talks = [
            talk_item("/t1", "The Living Bread", "John Doe"),
            talk_item("/t2", "The Living Bread", "Other Speaker"),
        ]
        .join("");
        let html = session_block("/s1", "Sunday Morning Session", &talks);

        let index = TopicIndex::from_records(vec![
            TalkByTopic {
                link: "/t1".to_string(),
                speaker: "John Doe".to_string(),
                title: "The Living Bread".to_string(),
                topic: "Sacrament".to_string(),
            },
            TalkByTopic {
                link: "/t1".to_string(),
                speaker: "John Doe".to_string(),
                title: "The Living Bread".to_string(),
                topic: "Faith".to_string(),
            },
        ]);
        let extractor = SessionExtractor::new(&index);
        let sessions = extractor.extract_sessions(&html, &conference());

        assert_eq!(sessions[0].talks[0].topics, vec!["Sacrament", "Faith"]);
        // Same title, different speaker: no join
        assert!(sessions[0].talks[1].topics.is_empty());
    }
}
