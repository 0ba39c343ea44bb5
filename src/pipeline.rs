// src/pipeline.rs
//! Token -> fetch -> validate -> rank -> (optional) diagnostics, strictly in sequence.

use std::path::PathBuf;

use anyhow::{Context, Result};
use metrics::gauge;
use tracing::{info, warn};

use crate::auth::acquire_token;
use crate::client::ApiClient;
use crate::config::PipelineConfig;
use crate::fetch::{fetch_dataset, DelayPolicy, FetchStatus};
use crate::rank::rank_file;
use crate::submit::{submit_file, DiagnosticCheck};
use crate::validate::validate_and_persist;

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    pub fetch: FetchStatus,
    pub pages: usize,
    pub fetched: usize,
    pub validated: usize,
    pub dropped: usize,
    pub ranked: usize,
    pub validated_path: PathBuf,
    pub topk_path: PathBuf,
    pub diagnostics: Vec<(DiagnosticCheck, Option<String>)>,
}

/// Run one full pass. Errors only for fatal conditions (no token, unwritable
/// output); a partial fetch is reported through `PipelineReport::fetch`.
pub async fn run_pipeline(cfg: &PipelineConfig, delay: &dyn DelayPolicy) -> Result<PipelineReport> {
    crate::telemetry::ensure_metrics_described();

    let client = ApiClient::from_config(cfg).context("building http client")?;
    let token = acquire_token(&client).await?;

    info!(target: "pipeline", delay = delay.name(), "fetching dataset");
    let outcome = fetch_dataset(&client, &token, delay).await;
    if let Some(failure) = outcome.failure() {
        warn!(
            target: "pipeline",
            pages = outcome.pages,
            records = outcome.records.len(),
            reason = %failure,
            "continuing with partial dataset"
        );
    }
    let fetched = outcome.records.len();

    let validated_path = cfg.validated_path();
    let validation = validate_and_persist(outcome.records, &validated_path)?;

    let topk_path = cfg.topk_path();
    let ranked = rank_file(&validated_path, &topk_path, cfg.top_k)?;

    let mut diagnostics = Vec::new();
    if cfg.run_diagnostics {
        for (check, path) in [
            (DiagnosticCheck::DataValidation, &validated_path),
            (DiagnosticCheck::TopkSort, &topk_path),
        ] {
            let message = submit_file(&client, &token, check, path).await;
            diagnostics.push((check, message));
        }
    }

    gauge!("pipeline_last_run_ts").set(chrono::Utc::now().timestamp() as f64);

    let report = PipelineReport {
        fetch: outcome.status,
        pages: outcome.pages,
        fetched,
        validated: validation.records.len(),
        dropped: validation.dropped,
        ranked: ranked.len(),
        validated_path,
        topk_path,
        diagnostics,
    };
    info!(
        target: "pipeline",
        pages = report.pages,
        fetched = report.fetched,
        validated = report.validated,
        dropped = report.dropped,
        ranked = report.ranked,
        "pipeline finished"
    );
    Ok(report)
}
