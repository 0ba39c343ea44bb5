// src/fetch/mod.rs
//! Cursor-based pagination over `POST {base}/download-dataset`.
//!
//! `Fetching(cursor) -> Fetching(next) | Done | Failed`. The first failure ends
//! the loop; whatever was accumulated is returned with the failure attached.
//! No page is retried.

pub mod delay;

use std::fmt;

use metrics::counter;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::auth::AuthToken;
use crate::client::{ApiClient, HEADER_AUTHORIZATION_TOKEN};

pub use delay::{DelayPolicy, FixedDelay, NoDelay};

pub const DOWNLOAD_PATH: &str = "download-dataset";

/// Why a fetch loop stopped before the server signalled the last page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    Unauthorized,
    NotFound,
    RateLimited,
    UnexpectedStatus(u16),
    Transport(String),
    MalformedPage(String),
}

impl FetchFailure {
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => FetchFailure::Unauthorized,
            StatusCode::NOT_FOUND => FetchFailure::NotFound,
            StatusCode::TOO_MANY_REQUESTS => FetchFailure::RateLimited,
            other => FetchFailure::UnexpectedStatus(other.as_u16()),
        }
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailure::Unauthorized => {
                write!(f, "unauthorized, check the authorization token")
            }
            FetchFailure::NotFound => write!(f, "dataset not found"),
            FetchFailure::RateLimited => write!(f, "rate limit exceeded, try again later"),
            FetchFailure::UnexpectedStatus(s) => write!(f, "unexpected status {s}"),
            FetchFailure::Transport(e) => write!(f, "transport error: {e}"),
            FetchFailure::MalformedPage(e) => write!(f, "malformed page: {e}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState {
    Fetching { cursor: String },
    Done,
    Failed(FetchFailure),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    Complete,
    Partial(FetchFailure),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub records: Vec<Value>,
    pub pages: usize,
    pub status: FetchStatus,
}

impl FetchOutcome {
    pub fn is_complete(&self) -> bool {
        matches!(self.status, FetchStatus::Complete)
    }

    pub fn failure(&self) -> Option<&FetchFailure> {
        match &self.status {
            FetchStatus::Complete => None,
            FetchStatus::Partial(f) => Some(f),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PageEnvelope {
    data: PageData,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PageData {
    dataset_url: String,
    #[serde(default)]
    next_id: Option<String>,
}

struct Page {
    records: Vec<Value>,
    next_id: String,
    message: Option<String>,
}

pub struct Fetcher<'a> {
    client: &'a ApiClient,
    token: &'a AuthToken,
    delay: &'a dyn DelayPolicy,
}

impl<'a> Fetcher<'a> {
    pub fn new(client: &'a ApiClient, token: &'a AuthToken, delay: &'a dyn DelayPolicy) -> Self {
        Self {
            client,
            token,
            delay,
        }
    }

    /// Drive the state machine until `Done` or `Failed`.
    pub async fn run(&self) -> FetchOutcome {
        crate::telemetry::ensure_metrics_described();

        let mut records = Vec::new();
        let mut pages = 0usize;
        let mut state = FetchState::Fetching {
            cursor: String::new(),
        };

        loop {
            state = match state {
                FetchState::Fetching { cursor } => match self.fetch_page(&cursor).await {
                    Ok(page) => {
                        pages += 1;
                        let n = page.records.len();
                        records.extend(page.records);
                        counter!("fetch_pages_total").increment(1);
                        counter!("fetch_records_total").increment(n as u64);
                        info!(
                            target: "fetch",
                            page = pages,
                            records = n,
                            next_id = %page.next_id,
                            server_message = page.message.as_deref().unwrap_or_default(),
                            "page fetched"
                        );

                        if page.next_id.is_empty() {
                            FetchState::Done
                        } else {
                            self.delay.wait(pages).await;
                            FetchState::Fetching {
                                cursor: page.next_id,
                            }
                        }
                    }
                    Err(failure) => FetchState::Failed(failure),
                },
                FetchState::Done => {
                    info!(target: "fetch", pages, records = records.len(), "no more records available");
                    return FetchOutcome {
                        records,
                        pages,
                        status: FetchStatus::Complete,
                    };
                }
                FetchState::Failed(failure) => {
                    counter!("fetch_failures_total").increment(1);
                    warn!(
                        target: "fetch",
                        pages,
                        records = records.len(),
                        reason = %failure,
                        "fetch stopped early, returning partial dataset"
                    );
                    return FetchOutcome {
                        records,
                        pages,
                        status: FetchStatus::Partial(failure),
                    };
                }
            };
        }
    }

    async fn fetch_page(&self, cursor: &str) -> Result<Page, FetchFailure> {
        let url = self.client.url(DOWNLOAD_PATH);
        let resp = self
            .client
            .http()
            .post(&url)
            .header(HEADER_AUTHORIZATION_TOKEN, self.token.as_str())
            .header(CONTENT_TYPE, "application/json")
            .json(&json!({ "next_id": cursor }))
            .send()
            .await
            .map_err(|e| FetchFailure::Transport(e.to_string()))?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(FetchFailure::from_status(status));
        }

        let envelope: PageEnvelope = resp
            .json()
            .await
            .map_err(|e| FetchFailure::MalformedPage(e.to_string()))?;

        let records = self.fetch_page_body(&envelope.data.dataset_url).await?;

        Ok(Page {
            records,
            next_id: envelope.data.next_id.unwrap_or_default(),
            message: envelope.message,
        })
    }

    /// The page body lives at a separate, pre-signed location. One page is
    /// buffered in full before it is parsed; memory is bounded by page size,
    /// not by dataset size.
    async fn fetch_page_body(&self, dataset_url: &str) -> Result<Vec<Value>, FetchFailure> {
        let resp = self
            .client
            .http()
            .get(dataset_url)
            .send()
            .await
            .map_err(|e| FetchFailure::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            warn!(target: "fetch", status = status.as_u16(), "page body download failed");
            return Err(FetchFailure::UnexpectedStatus(status.as_u16()));
        }

        resp.json::<Vec<Value>>()
            .await
            .map_err(|e| FetchFailure::MalformedPage(e.to_string()))
    }
}

/// Convenience wrapper around [`Fetcher::run`].
pub async fn fetch_dataset(
    client: &ApiClient,
    token: &AuthToken,
    delay: &dyn DelayPolicy,
) -> FetchOutcome {
    Fetcher::new(client, token, delay).run().await
}
