// src/services/catalog.rs

//! Conference catalog crawler.
//!
//! Walks the top-level catalog in two passes: direct per-conference entries,
//! then grouped decade-range entries whose pages are fetched and scanned for
//! further per-conference entries. The source lists newest-first; the merged
//! result is reversed so the earliest requested year comes first.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::{Config, Conference};
use crate::services::DocumentSource;

static CONFERENCE_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)<a[^>]*href="([^"]*)"[^>]*><div[^>]*><img[^>]*></div><span[^>]*>([A-Z][a-z]* \d{4})</span></a>"#,
    )
    .expect("valid conference entry pattern")
});

static GROUP_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)<a[^>]*href="([^"]*)"[^>]*><div[^>]*><img[^>]*></div><span[^>]*>(\d{4}.\d{4})</span></a>"#,
    )
    .expect("valid group entry pattern")
});

static GROUP_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(\d{4})(\d{4})\?lang=").expect("valid group range pattern"));

static LINK_YEAR_MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})/(\d{2})\?lang=").expect("valid year/month pattern"));

static LANGUAGE_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)data-lang=".*?" data-clang="(.*?)">(.*?)</a>"#)
        .expect("valid language entry pattern")
});

/// Crawler over the conference index document.
pub struct CatalogCrawler<'a> {
    config: &'a Config,
    source: &'a dyn DocumentSource,
}

impl<'a> CatalogCrawler<'a> {
    pub fn new(config: &'a Config, source: &'a dyn DocumentSource) -> Self {
        Self { config, source }
    }

    /// Discover every conference within the configured year range, ordered
    /// earliest-first.
    pub async fn discover_conferences(&self) -> Vec<Conference> {
        let index = self
            .source
            .fetch(&self.config.conference_index_url(), self.config.keep_cache)
            .await;

        let mut conferences = self.parse_entries(&index);
        conferences.extend(self.grouped_range_conferences(&index).await);

        // Source order is newest to oldest
        conferences.reverse();
        conferences
    }

    /// Map of language code to display name from the language listing.
    pub async fn discover_languages(&self) -> HashMap<String, String> {
        let html = self
            .source
            .fetch(&self.config.languages_url(), self.config.keep_cache)
            .await;

        LANGUAGE_ENTRY
            .captures_iter(&html)
            .map(|caps| (caps[1].to_string(), caps[2].to_string()))
            .collect()
    }

    /// Direct per-conference entries, filtered to the requested range.
    fn parse_entries(&self, html: &str) -> Vec<Conference> {
        CONFERENCE_ENTRY
            .captures_iter(html)
            .filter_map(|caps| {
                let link = caps[1].to_string();
                let (year, month) = link_year_month(&link)?;
                if year < self.config.start_year || year > self.config.end_year {
                    return None;
                }
                Some(Conference {
                    link,
                    title: caps[2].to_string(),
                    year,
                    month,
                })
            })
            .collect()
    }

    /// Second pass: decade-range groups overlapping the requested range are
    /// fetched and scanned for direct entries of their own.
    async fn grouped_range_conferences(&self, html: &str) -> Vec<Conference> {
        let mut result = Vec::new();
        for caps in GROUP_ENTRY.captures_iter(html) {
            let link = &caps[1];
            let Some((group_start, group_end)) = group_range(link) else {
                continue;
            };
            if group_end < self.config.start_year || group_start > self.config.end_year {
                continue;
            }

            let page = self
                .source
                .fetch(&self.config.absolute_url(link), false)
                .await;
            if !page.is_empty() {
                result.extend(self.parse_entries(&page));
            }
        }
        result
    }
}

/// Parse the year and month embedded in a conference locator.
fn link_year_month(link: &str) -> Option<(u16, u8)> {
    let caps = LINK_YEAR_MONTH.captures(link)?;
    Some((caps[1].parse().ok()?, caps[2].parse().ok()?))
}

/// Parse the year range embedded in a group locator.
fn group_range(link: &str) -> Option<(u16, u16)> {
    let caps = GROUP_RANGE.captures(link)?;
    Some((caps[1].parse().ok()?, caps[2].parse().ok()?))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use super::*;

    struct FakeSource {
        pages: HashMap<String, String>,
    }

    #[async_trait]
    impl DocumentSource for FakeSource {
        async fn fetch(&self, url: &str, _bypass_cache: bool) -> String {
            self.pages.get(url).cloned().unwrap_or_default()
        }
    }

    fn entry(link: &str, label: &str) -> String {
        format!(
            r#"<a class="item" href="{link}"><div class="tile"><img src="cover.png"></div><span class="label">{label}</span></a>"#
        )
    }

    fn config(start: u16, end: u16) -> Config {
        let mut config = Config::default();
        config.start_year = start;
        config.end_year = end;
        config
    }

    #[tokio::test]
    async fn discovers_direct_and_grouped_entries_in_ascending_order() {
        let config = config(1998, 2021);

        // Index lists newest-first: two direct entries, then a decade group
        let index = [
            entry("/study/general-conference/2021/04?lang=eng", "April 2021"),
            entry("/study/general-conference/2020/10?lang=eng", "October 2020"),
            entry("/study/general-conference/19901999?lang=eng", "1990-1999"),
            entry("/study/general-conference/19801989?lang=eng", "1980-1989"),
        ]
        .join("\n");

        let group_page = [
            entry("/study/general-conference/1999/10?lang=eng", "October 1999"),
            entry("/study/general-conference/1998/04?lang=eng", "April 1998"),
            entry("/study/general-conference/1995/04?lang=eng", "April 1995"),
        ]
        .join("\n");

        let mut pages = HashMap::new();
        pages.insert(config.conference_index_url(), index);
        pages.insert(
            config.absolute_url("/study/general-conference/19901999?lang=eng"),
            group_page,
        );
        let source = FakeSource { pages };

        let crawler = CatalogCrawler::new(&config, &source);
        let conferences = crawler.discover_conferences().await;

        // 1995 is below the requested range; the 1980s group is never fetched
        let labels: Vec<_> = conferences.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(
            labels,
            vec!["April 1998", "October 1999", "October 2020", "April 2021"]
        );

        assert_eq!(conferences[0].year, 1998);
        let keys: Vec<_> = conferences.iter().map(|c| (c.year, c.month)).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[tokio::test]
    async fn empty_index_yields_no_conferences() {
        let config = config(1971, 2024);
        let source = FakeSource {
            pages: HashMap::new(),
        };
        let crawler = CatalogCrawler::new(&config, &source);
        assert!(crawler.discover_conferences().await.is_empty());
    }

    #[tokio::test]
    async fn languages_map_extracted() {
        let config = Config::default();
        let html = concat!(
            r#"<a data-lang="en" data-clang="eng">English</a>"#,
            r#"<a data-lang="es" data-clang="spa">Español</a>"#,
        );
        let mut pages = HashMap::new();
        pages.insert(config.languages_url(), html.to_string());
        let source = FakeSource { pages };

        let crawler = CatalogCrawler::new(&config, &source);
        let langs = crawler.discover_languages().await;
        assert_eq!(langs.get("eng").map(String::as_str), Some("English"));
        assert_eq!(langs.get("spa").map(String::as_str), Some("Español"));
    }
}
