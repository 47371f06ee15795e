use crate::config::AppConfig;
use anyhow::Result;
use sheetmeta::{run_sync, GoogleSheetsFetcher, SqliteStore, SyncOutcome};
use std::time::Duration;
use tracing::info;

/// Runs one sync. Fail-soft outcomes are reported but are not errors.
pub async fn handle_sync(config: &AppConfig, store: &SqliteStore) -> Result<()> {
    let credentials_path = config.credentials_path();
    info!(
        "Using service account key at '{}'.",
        credentials_path.display()
    );

    let fetcher = GoogleSheetsFetcher::new(
        credentials_path,
        config.sheets_api_base_url.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )?;

    match run_sync(store, &fetcher).await? {
        SyncOutcome::Applied(report) => {
            println!(
                "✅ Updated {} meta key(s) on record {} ({} column(s) skipped).",
                report.entries_applied,
                report.target_record_id,
                report.skipped_columns.len()
            );
        }
        SyncOutcome::Skipped(reason) => {
            println!("Nothing synced: {reason}");
        }
    }

    Ok(())
}
