// src/config.rs
//! Pipeline configuration: base URL from the environment, tunables from an
//! optional TOML file and env overrides.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

pub const ENV_API_URL: &str = "API_URL";
pub const ENV_CONFIG_PATH: &str = "PIPELINE_CONFIG_PATH";
pub const ENV_INTER_PAGE_DELAY_SECS: &str = "INTER_PAGE_DELAY_SECS";
pub const ENV_OUTPUT_DIR: &str = "OUTPUT_DIR";
pub const ENV_RUN_DIAGNOSTICS: &str = "RUN_DIAGNOSTICS";

pub const DEFAULT_CONFIG_PATH: &str = "config/pipeline.toml";
pub const DEFAULT_INTER_PAGE_DELAY: Duration = Duration::from_secs(10);
pub const DEFAULT_TOP_K: usize = 10;
pub const VALIDATED_FILE: &str = "validated_dataset.json";
pub const TOPK_FILE: &str = "topk_results.json";

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// API root without trailing slash, e.g. `https://host/prod`.
    pub base_url: String,
    pub inter_page_delay: Duration,
    pub output_dir: PathBuf,
    pub validated_file: String,
    pub topk_file: String,
    pub top_k: usize,
    pub run_diagnostics: bool,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

/// Optional tunables read from `config/pipeline.toml`. The base URL only
/// ever comes from `API_URL`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileOverrides {
    inter_page_delay_secs: Option<u64>,
    output_dir: Option<PathBuf>,
    top_k: Option<usize>,
    run_diagnostics: Option<bool>,
    request_timeout_secs: Option<u64>,
    connect_timeout_secs: Option<u64>,
}

impl PipelineConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            inter_page_delay: DEFAULT_INTER_PAGE_DELAY,
            output_dir: PathBuf::from("."),
            validated_file: VALIDATED_FILE.to_string(),
            topk_file: TOPK_FILE.to_string(),
            top_k: DEFAULT_TOP_K,
            run_diagnostics: false,
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_inter_page_delay(mut self, delay: Duration) -> Self {
        self.inter_page_delay = delay;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = k;
        self
    }

    pub fn with_diagnostics(mut self, on: bool) -> Self {
        self.run_diagnostics = on;
        self
    }

    /// Build from the process environment:
    /// 1) `API_URL` (required)
    /// 2) `$PIPELINE_CONFIG_PATH` or `config/pipeline.toml` (optional)
    /// 3) `INTER_PAGE_DELAY_SECS`, `OUTPUT_DIR`, `RUN_DIAGNOSTICS` overrides
    pub fn from_env() -> Result<Self, ConfigError> {
        let base = std::env::var(ENV_API_URL)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingBaseUrl { name: ENV_API_URL })?;
        let mut cfg = Self::new(base);

        if let Some(file) = load_overrides_default()? {
            cfg.apply_file(file);
        }

        if let Ok(v) = std::env::var(ENV_INTER_PAGE_DELAY_SECS) {
            let secs = v.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                name: ENV_INTER_PAGE_DELAY_SECS,
                value: v.clone(),
            })?;
            cfg.inter_page_delay = Duration::from_secs(secs);
        }
        if let Ok(v) = std::env::var(ENV_OUTPUT_DIR) {
            if !v.trim().is_empty() {
                cfg.output_dir = PathBuf::from(v.trim());
            }
        }
        if let Ok(v) = std::env::var(ENV_RUN_DIAGNOSTICS) {
            cfg.run_diagnostics = parse_flag(&v).ok_or(ConfigError::InvalidValue {
                name: ENV_RUN_DIAGNOSTICS,
                value: v.clone(),
            })?;
        }

        Ok(cfg)
    }

    pub fn validated_path(&self) -> PathBuf {
        self.output_dir.join(&self.validated_file)
    }

    pub fn topk_path(&self) -> PathBuf {
        self.output_dir.join(&self.topk_file)
    }

    fn apply_file(&mut self, f: FileOverrides) {
        if let Some(s) = f.inter_page_delay_secs {
            self.inter_page_delay = Duration::from_secs(s);
        }
        if let Some(d) = f.output_dir {
            self.output_dir = d;
        }
        if let Some(k) = f.top_k {
            self.top_k = k;
        }
        if let Some(b) = f.run_diagnostics {
            self.run_diagnostics = b;
        }
        if let Some(s) = f.request_timeout_secs {
            self.request_timeout = Duration::from_secs(s);
        }
        if let Some(s) = f.connect_timeout_secs {
            self.connect_timeout = Duration::from_secs(s);
        }
    }
}

fn normalize_base_url(s: &str) -> String {
    s.trim().trim_end_matches('/').to_string()
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// $PIPELINE_CONFIG_PATH must exist when set; the default path may be absent.
fn load_overrides_default() -> Result<Option<FileOverrides>, ConfigError> {
    if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if !pb.exists() {
            return Err(ConfigError::FileNotFound { path: pb });
        }
        return load_overrides_from(&pb).map(Some);
    }
    let default = PathBuf::from(DEFAULT_CONFIG_PATH);
    if default.exists() {
        return load_overrides_from(&default).map(Some);
    }
    Ok(None)
}

fn load_overrides_from(path: &Path) -> Result<FileOverrides, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
