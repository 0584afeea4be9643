// src/lib.rs

//! confmirror library

pub mod error;
pub mod models;
pub mod pipeline;
pub mod playlist;
pub mod progress;
pub mod services;
pub mod storage;
pub mod utils;
