// src/services/fetcher.rs

//! Network retrieval behind the document cache.
//!
//! The fetcher is the only writer to the cache. It never raises to callers:
//! a failed retrieval is logged and degrades to an empty document, which
//! every extractor treats as "no matches".

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::{AppError, Result};
use crate::models::Config;
use crate::storage::DocumentCache;
use crate::utils::text;

/// Required request headers, shipped as an external resource so they can be
/// adjusted without touching code.
const HEADER_RESOURCE: &str = include_str!("../../resources/headers.json");

/// Source of document text, keyed by absolute URL.
///
/// `bypass_cache` skips both the cache lookup and the write-back; it is used
/// for index pages when the cache persists between runs, so newly published
/// conferences still appear.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch(&self, url: &str, bypass_cache: bool) -> String;
}

/// Document source that can also retrieve raw media bytes.
///
/// Media downloads are never cached; errors propagate so the caller can
/// skip the unit.
#[async_trait]
pub trait MediaSource: DocumentSource {
    async fn download_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

/// HTTP fetcher with a cache-aside layer.
///
/// Transport compression (gzip/brotli/deflate) is negotiated and decoded by
/// the client before the body reaches us as UTF-8 text.
pub struct PageFetcher {
    client: Client,
    cache: DocumentCache,
}

impl PageFetcher {
    pub fn new(config: &Config, cache: DocumentCache) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.crawler.user_agent)
            .timeout(Duration::from_secs(config.crawler.timeout_secs))
            .default_headers(Self::required_headers()?)
            .build()?;

        Ok(Self { client, cache })
    }

    /// The cache this fetcher writes through.
    pub fn cache(&self) -> &DocumentCache {
        &self.cache
    }

    /// Parse the header-definition resource into a header map.
    fn required_headers() -> Result<HeaderMap> {
        let entries: BTreeMap<String, String> = serde_json::from_str(HEADER_RESOURCE)?;

        let mut headers = HeaderMap::new();
        for (name, value) in &entries {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| AppError::config(format!("Bad header name '{name}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| AppError::config(format!("Bad header value for '{name:?}': {e}")))?;
            headers.insert(name, value);
        }
        Ok(headers)
    }

    /// Retrieve a document and, unless bypassing, store it in the cache.
    async fn retrieve(&self, url: &str, store: bool) -> Result<String> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        if store {
            self.cache.write(url, &body).await?;
        }
        Ok(body)
    }

}

#[async_trait]
impl MediaSource for PageFetcher {
    async fn download_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let url = text::unescape_entities(url);
        let response = self.client.get(&url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl DocumentSource for PageFetcher {
    async fn fetch(&self, url: &str, bypass_cache: bool) -> String {
        let url = text::unescape_entities(url);

        if !bypass_cache {
            match self.cache.read(&url).await {
                Ok(Some(cached)) => {
                    log::debug!("Reading cached: {}", url);
                    return cached;
                }
                Ok(None) => {}
                Err(e) => log::warn!("Cache read failed for {}: {}", url, e),
            }
        }

        log::debug!("Retrieving: {}", url);
        match self.retrieve(&url, !bypass_cache).await {
            Ok(body) => body,
            Err(e) => {
                log::error!("Problem with http request ({}): {}", url, e);
                String::new()
            }
        }
    }
}
