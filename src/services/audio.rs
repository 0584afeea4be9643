// src/services/audio.rs

//! Audio location resolution for a talk document.
//!
//! Two tiers, tried in order:
//!
//! 1. A direct anchor labeled as the page's MP3 download link.
//! 2. A page-state payload embedded as a base64-encoded script blob; the
//!    decoded text is searched for the media-URL fragment tagged as the
//!    audio variant.
//!
//! Talks with neither pattern (music-only segments) have no recording and
//! resolve to `None`.

use std::sync::LazyLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use regex::Regex;
use serde::Deserialize;

use crate::models::Audio;

static DOWNLOAD_ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<a[^>]*href="([^"]*)"[^>]*>This Page \(MP3\).*?</a>"#)
        .expect("valid download anchor pattern")
});

static DOWNLOAD_FILENAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/([^/]*\.mp3)\?lang=").expect("valid download filename pattern")
});

static SCRIPT_STATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<script>window\.__INITIAL_STATE__[^"]*"([^"]*)";</script>"#)
        .expect("valid script state pattern")
});

static MEDIA_FRAGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{"mediaUrl":"([^"]*)","variant":"audio"\}"#)
        .expect("valid media fragment pattern")
});

static MEDIA_FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/([^/]*\.mp3)").expect("valid media filename pattern"));

/// Media fragment embedded in the decoded page state.
#[derive(Debug, Deserialize)]
struct MediaVariant {
    #[serde(rename = "mediaUrl")]
    media_url: String,
    variant: String,
}

/// Resolve the downloadable audio location from a talk document.
///
/// Returns `None` when neither tier matches or a filename cannot be derived
/// from the link that was found.
pub fn resolve_audio(html: &str) -> Option<Audio> {
    if let Some(caps) = DOWNLOAD_ANCHOR.captures(html) {
        let link = caps[1].to_string();
        // Reuse the filename from the download URL, excluding the language
        // query suffix
        let file = DOWNLOAD_FILENAME.captures(&link)?[1].to_string();
        return Some(Audio { link, file });
    }

    embedded_state_audio(html)
}

/// Fallback tier: the media link buried in the base64-encoded page state.
fn embedded_state_audio(html: &str) -> Option<Audio> {
    let blob = SCRIPT_STATE.captures(html)?;
    let decoded = BASE64.decode(blob[1].as_bytes()).ok()?;
    let state = String::from_utf8_lossy(&decoded);

    let fragment = MEDIA_FRAGMENT.find(&state)?;
    let media: MediaVariant = serde_json::from_str(fragment.as_str()).ok()?;
    if media.variant != "audio" {
        return None;
    }

    let file = MEDIA_FILENAME.captures(&media.media_url)?[1].to_string();
    Some(Audio {
        link: media.media_url,
        file,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIRECT_DOC: &str = concat!(
        r#"<p>intro</p>"#,
        r#"<a class="dl" href="https://media.example.org/audio/2020-04-talk-eng.mp3?lang=eng">"#,
        r#"This Page (MP3)<span>12 MB</span></a>"#,
    );

    fn embedded_doc(payload: &str) -> String {
        let blob = BASE64.encode(payload);
        format!(r#"<html><script>window.__INITIAL_STATE__ = "{blob}";</script></html>"#)
    }

    #[test]
    fn direct_anchor_resolves() {
        let audio = resolve_audio(DIRECT_DOC).unwrap();
        assert_eq!(
            audio.link,
            "https://media.example.org/audio/2020-04-talk-eng.mp3?lang=eng"
        );
        assert_eq!(audio.file, "2020-04-talk-eng.mp3");
    }

    #[test]
    fn embedded_script_fallback_resolves() {
        let payload = concat!(
            r#"{"other":true},"#,
            r#"{"mediaUrl":"https://media.example.org/audio/talk.mp3","variant":"audio"},"#,
            r#"{"mediaUrl":"https://media.example.org/video/talk.mp4","variant":"video"}"#,
        );
        let doc = embedded_doc(payload);

        let audio = resolve_audio(&doc).unwrap();
        assert_eq!(audio.link, "https://media.example.org/audio/talk.mp3");
        assert_eq!(audio.file, "talk.mp3");
    }

    #[test]
    fn embedded_script_without_audio_variant_is_absent() {
        let payload = r#"{"mediaUrl":"https://media.example.org/video/talk.mp4","variant":"video"}"#;
        assert!(resolve_audio(&embedded_doc(payload)).is_none());
    }

    #[test]
    fn document_without_either_pattern_is_absent() {
        assert!(resolve_audio("<html><body>A musical number</body></html>").is_none());
    }

    #[test]
    fn direct_anchor_without_filename_is_absent() {
        let doc = r#"<a href="https://media.example.org/page">This Page (MP3)</a>"#;
        assert!(resolve_audio(doc).is_none());
    }
}
