//! Error types shared by the pipeline stages.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while assembling a [`crate::config::PipelineConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `API_URL` is unset or blank. Fatal before any network call.
    #[error("missing required environment variable: {name}")]
    MissingBaseUrl { name: &'static str },

    #[error("invalid value '{value}' for {name}")]
    InvalidValue { name: &'static str, value: String },

    #[error("config file does not exist: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Errors that abort a pipeline stage.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Token request answered with something other than a usable 200.
    #[error("authorization failed with status {status}")]
    Auth { status: u16 },

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// 200 from the token endpoint without `data.authorizationToken`.
    #[error("authorization response did not contain a token")]
    MissingToken,
}
