// src/storage/cache.rs

//! Read-through document cache.
//!
//! ## Storage Layout
//!
//! ```text
//! {root}/
//! └── {language}/
//!     └── {normalizedURL}    # one flat file per cached document
//! ```
//!
//! The key is the entity-decoded, percent-encoded form of the full resource
//! locator. There is no eviction and no expiry: entries persist until
//! `clear()` removes the whole language-scoped directory, so repeated runs
//! are deterministic and fast at the cost of staleness.

use std::path::PathBuf;

use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::utils::text;

/// Language-scoped flat-file cache over fetched document text.
#[derive(Debug, Clone)]
pub struct DocumentCache {
    root: PathBuf,
    language: String,
}

impl DocumentCache {
    /// Create a cache rooted at the given directory for one language.
    pub fn new(root: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            language: language.into(),
        }
    }

    /// Directory holding this language's entries.
    pub fn language_dir(&self) -> PathBuf {
        self.root.join(&self.language)
    }

    /// Whether any entries exist for this language.
    pub fn exists(&self) -> bool {
        self.language_dir().is_dir()
    }

    /// Normalized cache key for a resource locator.
    fn key(url: &str) -> String {
        urlencoding::encode(&text::unescape_entities(url)).into_owned()
    }

    /// Full path of the entry for a locator.
    fn path(&self, url: &str) -> PathBuf {
        self.language_dir().join(Self::key(url))
    }

    /// Read a cached document, returning `None` on a miss.
    pub async fn read(&self, url: &str) -> Result<Option<String>> {
        let path = self.path(url);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Write a document under its normalized key (write to temp, then
    /// rename, so readers never see a partial entry).
    pub async fn write(&self, url: &str, text: &str) -> Result<()> {
        let path = self.path(url);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(text.as_bytes()).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Remove every entry for this language.
    pub async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_dir_all(self.language_dir()).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_and_read() {
        let tmp = TempDir::new().unwrap();
        let cache = DocumentCache::new(tmp.path(), "eng");

        let url = "https://example.org/study?lang=eng&amp;x=1";
        cache.write(url, "<html>doc</html>").await.unwrap();

        let text = cache.read(url).await.unwrap();
        assert_eq!(text.as_deref(), Some("<html>doc</html>"));

        // Entity-decoded form of the same locator hits the same entry
        let decoded = "https://example.org/study?lang=eng&x=1";
        let text = cache.read(decoded).await.unwrap();
        assert_eq!(text.as_deref(), Some("<html>doc</html>"));
    }

    #[tokio::test]
    async fn test_read_miss() {
        let tmp = TempDir::new().unwrap();
        let cache = DocumentCache::new(tmp.path(), "eng");

        let text = cache.read("https://example.org/none").await.unwrap();
        assert!(text.is_none());
    }

    #[tokio::test]
    async fn test_languages_are_isolated() {
        let tmp = TempDir::new().unwrap();
        let eng = DocumentCache::new(tmp.path(), "eng");
        let spa = DocumentCache::new(tmp.path(), "spa");

        eng.write("https://example.org/a", "english").await.unwrap();
        assert!(spa.read("https://example.org/a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_removes_language_dir() {
        let tmp = TempDir::new().unwrap();
        let cache = DocumentCache::new(tmp.path(), "eng");

        cache.write("https://example.org/a", "doc").await.unwrap();
        assert!(cache.exists());

        cache.clear().await.unwrap();
        assert!(!cache.exists());
        // Clearing twice is fine
        cache.clear().await.unwrap();
    }
}
