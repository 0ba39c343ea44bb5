//! Restaurant ranker: binary entrypoint.
//! Fetches the full dataset, writes `validated_dataset.json` and `topk_results.json`.

use std::process::ExitCode;

use restaurant_ranker::fetch::FixedDelay;
use restaurant_ranker::{run_pipeline, FetchStatus, PipelineConfig, PipelineError};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact human logs by default; JSON lines with `LOG_FORMAT=json`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("restaurant_ranker=info,info"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = match PipelineConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = %e, "configuration error");
            return ExitCode::FAILURE;
        }
    };

    let delay = FixedDelay(cfg.inter_page_delay);
    match run_pipeline(&cfg, &delay).await {
        Ok(report) => {
            match &report.fetch {
                FetchStatus::Complete => info!(pages = report.pages, "dataset fetched completely"),
                FetchStatus::Partial(reason) => {
                    warn!(pages = report.pages, %reason, "dataset is partial")
                }
            }
            info!(
                validated = report.validated,
                ranked = report.ranked,
                validated_path = %report.validated_path.display(),
                topk_path = %report.topk_path.display(),
                "results written"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            match e.downcast_ref::<PipelineError>() {
                Some(PipelineError::Auth { status }) => {
                    error!(status, "could not obtain an authorization token")
                }
                _ => {
                    let error = format!("{e:#}");
                    error!(%error, "pipeline failed")
                }
            }
            ExitCode::FAILURE
        }
    }
}
