// src/utils/mod.rs

//! Utility functions and helpers.

pub mod paths;
pub mod text;
