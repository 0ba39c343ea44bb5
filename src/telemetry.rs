// src/telemetry.rs
use metrics::{describe_counter, describe_gauge};
use once_cell::sync::OnceCell;

/// One-time metric registration (so series carry descriptions once a recorder is installed).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("fetch_pages_total", "Dataset pages fetched successfully.");
        describe_counter!(
            "fetch_records_total",
            "Raw records accumulated from page bodies."
        );
        describe_counter!(
            "fetch_failures_total",
            "Fetch loops that ended in a failed state."
        );
        describe_counter!("validate_kept_total", "Records that passed the schema.");
        describe_counter!(
            "validate_dropped_total",
            "Records silently dropped by the schema."
        );
        describe_counter!(
            "submit_errors_total",
            "Diagnostic submissions that did not return a message."
        );
        describe_gauge!(
            "pipeline_last_run_ts",
            "Unix ts when the pipeline last finished."
        );
    });
}
