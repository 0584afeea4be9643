// src/pipeline/mod.rs

//! End-to-end mirroring pipeline.

mod run;

pub use run::Pipeline;
