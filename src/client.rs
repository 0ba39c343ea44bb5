// src/client.rs
use std::time::Duration;

use crate::config::PipelineConfig;

pub const HEADER_AUTHORIZATION_TOKEN: &str = "authorizationToken";

const USER_AGENT: &str = concat!("restaurant-ranker/", env!("CARGO_PKG_VERSION"));

/// Thin wrapper over `reqwest::Client` that knows the API root.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn from_config(cfg: &PipelineConfig) -> reqwest::Result<Self> {
        Self::with_timeouts(&cfg.base_url, cfg.connect_timeout, cfg.request_timeout)
    }

    pub fn with_timeouts(
        base_url: &str,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
