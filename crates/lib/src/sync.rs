//! # Sync Orchestration
//!
//! Runs one fetch → pair/sanitize → apply cycle. Each missing precondition
//! ends the run as a logged [`SyncOutcome::Skipped`] before anything is
//! written; only storage failures come back as errors.

use crate::apply::apply;
use crate::constants::{KEYS_ROW_INDEX, VALUES_ROW_INDEX};
use crate::errors::SyncError;
use crate::fetch::{FetchOutcome, SheetFetcher};
use crate::pairing::RowPair;
use crate::settings::SyncSettings;
use crate::store::MetaStore;
use crate::types::{SkipReason, SyncConfig, SyncOutcome, SyncReport};
use tracing::{debug, info, warn};

/// Loads settings from `store`, then runs the pipeline.
pub async fn run_sync(
    store: &dyn MetaStore,
    fetcher: &dyn SheetFetcher,
) -> Result<SyncOutcome, SyncError> {
    info!("Starting update process.");

    let settings = SyncSettings::load(store).await?;
    let config = match settings.resolve(store).await? {
        Ok(config) => config,
        Err(reason) => return Ok(skip(reason)),
    };

    run_sync_with(&config, store, fetcher).await
}

/// Runs the pipeline for an already-resolved configuration.
pub async fn run_sync_with(
    config: &SyncConfig,
    store: &dyn MetaStore,
    fetcher: &dyn SheetFetcher,
) -> Result<SyncOutcome, SyncError> {
    let rows = match fetcher.fetch(&config.range).await {
        FetchOutcome::Rows(rows) => rows,
        FetchOutcome::Empty => return Ok(skip(SkipReason::NoData)),
        FetchOutcome::Failed(e) => return Ok(skip(SkipReason::FetchFailed(e.to_string()))),
    };

    let Some(pair) = RowPair::select(&rows, KEYS_ROW_INDEX, VALUES_ROW_INDEX) else {
        return Ok(skip(SkipReason::RowsOutOfRange { rows: rows.len() }));
    };
    debug!("Meta keys: {:?}", pair.keys);
    debug!("Meta values: {:?}", pair.values);

    let skipped_columns = pair.skipped_columns();
    for col in &skipped_columns {
        info!("Skipping column {col} as meta key is empty.");
    }

    let entries = pair.sanitized_entries();
    let entries_applied = apply(store, config.target_record_id, &entries).await?;
    info!("All relevant meta keys and values have been updated.");

    Ok(SyncOutcome::Applied(SyncReport {
        target_record_id: config.target_record_id,
        rows_fetched: rows.len(),
        entries_applied,
        skipped_columns,
    }))
}

fn skip(reason: SkipReason) -> SyncOutcome {
    warn!("{reason}");
    SyncOutcome::Skipped(reason)
}
