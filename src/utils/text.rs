// src/utils/text.rs

//! Text transforms shared across the pipeline.

use scraper::Html;

/// Strip all markup from a fragment, keeping only its text content.
///
/// Character references are decoded by the parser, so `&amp;` comes back
/// as `&`.
pub fn strip_markup(input: &str) -> String {
    let fragment = Html::parse_fragment(input);
    fragment.root_element().text().collect()
}

/// Clean a talk title: strip markup, then keep only alphanumerics, spaces,
/// and `- _ .`, trimming trailing whitespace.
///
/// The transform is idempotent; cleaned titles pass through unchanged.
pub fn clean_title(title: &str) -> String {
    strip_markup(title)
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.'))
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// Decode the HTML character references that appear in catalog locators.
pub fn unescape_entities(input: &str) -> String {
    input
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Format a duration as concatenated non-zero components, largest first:
/// weeks, days, hours, minutes. Fractional minutes truncate; there is no
/// seconds field.
pub fn duration_text(duration_secs: u64) -> String {
    let mins = (duration_secs / 60) % 60;
    let hours = (duration_secs / (60 * 60)) % 24;
    let days = (duration_secs / (60 * 60 * 24)) % 7;
    let weeks = duration_secs / (60 * 60 * 24 * 7);

    let mut text = String::new();
    if weeks > 0 {
        text.push_str(&format!("{weeks}w"));
    }
    if days > 0 {
        text.push_str(&format!("{days}d"));
    }
    if hours > 0 {
        text.push_str(&format!("{hours}h"));
    }
    if mins > 0 {
        text.push_str(&format!("{mins}m"));
    }
    text
}
