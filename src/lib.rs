// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod rank;
pub mod record;
pub mod store;
pub mod submit;
pub mod telemetry;
pub mod validate;

// ---- Re-exports for stable public API ----
pub use crate::config::PipelineConfig;
pub use crate::error::{ConfigError, PipelineError};
pub use crate::fetch::{FetchFailure, FetchOutcome, FetchStatus};
pub use crate::pipeline::{run_pipeline, PipelineReport};
pub use crate::record::Record;
