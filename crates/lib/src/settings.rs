//! # Sync Settings
//!
//! Reads and writes the persisted options that drive a run, and resolves them
//! into the [`SyncConfig`] that is passed through the pipeline.

use crate::constants::{DEFAULT_RANGE, OPTION_FRONT_PAGE, OPTION_RANGE, OPTION_SPREADSHEET_ID};
use crate::errors::StoreError;
use crate::sanitize::sanitize_text;
use crate::store::MetaStore;
use crate::types::{RangeSpec, SkipReason, SyncConfig};
use serde::Serialize;
use tracing::info;

/// The settings as stored, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncSettings {
    pub spreadsheet_id: String,
    pub range: String,
    /// The raw `page_on_front` option, if any.
    pub front_page: Option<String>,
}

impl SyncSettings {
    /// Loads the settings. A range that was never stored falls back to
    /// [`DEFAULT_RANGE`]; a stored empty range stays empty.
    pub async fn load(store: &dyn MetaStore) -> Result<Self, StoreError> {
        Ok(Self {
            spreadsheet_id: store
                .get_option(OPTION_SPREADSHEET_ID)
                .await?
                .unwrap_or_default(),
            range: store
                .get_option(OPTION_RANGE)
                .await?
                .unwrap_or_else(|| DEFAULT_RANGE.to_string()),
            front_page: store.get_option(OPTION_FRONT_PAGE).await?,
        })
    }

    /// Loads the settings as they are stored, without the default range.
    pub async fn load_stored(store: &dyn MetaStore) -> Result<Self, StoreError> {
        Ok(Self {
            spreadsheet_id: store
                .get_option(OPTION_SPREADSHEET_ID)
                .await?
                .unwrap_or_default(),
            range: store.get_option(OPTION_RANGE).await?.unwrap_or_default(),
            front_page: store.get_option(OPTION_FRONT_PAGE).await?,
        })
    }

    /// Parses the front page option. Empty, zero, or non-numeric values mean
    /// no front page is set.
    pub fn front_page_id(&self) -> Option<i64> {
        self.front_page
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|id| *id > 0)
    }

    /// Validates the settings and resolves the target record.
    ///
    /// The outer `Result` carries storage failures; the inner one says whether
    /// the run can go ahead.
    pub async fn resolve(
        &self,
        store: &dyn MetaStore,
    ) -> Result<Result<SyncConfig, SkipReason>, StoreError> {
        if self.spreadsheet_id.is_empty() {
            return Ok(Err(SkipReason::MissingSpreadsheetId));
        }
        if self.range.is_empty() {
            return Ok(Err(SkipReason::MissingRange));
        }
        let Some(target_record_id) = self.front_page_id() else {
            return Ok(Err(SkipReason::NoFrontPage));
        };
        if !store.record_exists(target_record_id).await? {
            return Ok(Err(SkipReason::FrontPageNotFound(target_record_id)));
        }
        Ok(Ok(SyncConfig {
            range: RangeSpec::new(self.spreadsheet_id.clone(), self.range.clone()),
            target_record_id,
        }))
    }
}

/// Persists new settings. Inputs are text-sanitized before storage.
pub async fn save_settings(
    store: &dyn MetaStore,
    spreadsheet_id: &str,
    range: &str,
) -> Result<SyncSettings, StoreError> {
    let spreadsheet_id = sanitize_text(spreadsheet_id);
    let range = sanitize_text(range);
    store.set_option(OPTION_SPREADSHEET_ID, &spreadsheet_id).await?;
    store.set_option(OPTION_RANGE, &range).await?;
    info!("Settings saved: spreadsheet '{spreadsheet_id}', range '{range}'.");
    SyncSettings::load_stored(store).await
}

/// Sets the host's front page option.
pub async fn set_front_page(store: &dyn MetaStore, record_id: i64) -> Result<(), StoreError> {
    store
        .set_option(OPTION_FRONT_PAGE, &record_id.to_string())
        .await
}
