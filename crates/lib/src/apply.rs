//! # Applying Metadata
//!
//! Writes sanitized entries onto the target record in order. There is no
//! transaction: if a write fails, earlier writes stay and the error is
//! returned. Duplicate keys resolve last-write-wins.

use crate::errors::StoreError;
use crate::store::MetaStore;
use crate::types::SanitizedEntry;
use tracing::info;

/// Upserts each entry on `target_record_id` and returns the number written.
pub async fn apply(
    store: &dyn MetaStore,
    target_record_id: i64,
    entries: &[SanitizedEntry],
) -> Result<usize, StoreError> {
    for entry in entries {
        store
            .upsert_meta(target_record_id, &entry.key, &entry.value)
            .await?;
        info!(
            "Updated meta key '{}' with sanitized value '{}'.",
            entry.key, entry.value
        );
    }
    Ok(entries.len())
}
