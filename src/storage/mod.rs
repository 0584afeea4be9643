// src/storage/mod.rs

//! Persistent storage backends.

mod cache;

pub use cache::DocumentCache;
