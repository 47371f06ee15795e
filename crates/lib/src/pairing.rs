//! # Row Pairing
//!
//! Turns the fetched range into metadata entries by zipping a keys row with a
//! values row, column by column. Columns are driven by the keys row: a shorter
//! values row yields missing values, never a shorter output.

use crate::sanitize::sanitize_value;
use crate::types::{MetaEntry, SanitizedEntry};
use tracing::debug;

/// The two rows selected from a fetch, with bounds already checked.
#[derive(Debug, Clone, Copy)]
pub struct RowPair<'a> {
    pub keys: &'a [String],
    pub values: &'a [String],
}

impl<'a> RowPair<'a> {
    /// Picks the keys and values rows, or `None` if either index is absent.
    pub fn select(
        rows: &'a [Vec<String>],
        keys_row_index: usize,
        values_row_index: usize,
    ) -> Option<Self> {
        let keys = rows.get(keys_row_index)?;
        let values = rows.get(values_row_index)?;
        Some(Self { keys, values })
    }

    /// Column-ordered entries for every column with a non-empty key.
    pub fn entries(&self) -> impl Iterator<Item = MetaEntry> + '_ {
        self.keys
            .iter()
            .enumerate()
            .filter(|(_, key)| !key.is_empty())
            .map(|(col, key)| MetaEntry {
                key: key.clone(),
                raw_value: self.values.get(col).cloned(),
            })
    }

    /// Positions of columns whose key cell is empty.
    pub fn skipped_columns(&self) -> Vec<usize> {
        self.keys
            .iter()
            .enumerate()
            .filter(|(_, key)| key.is_empty())
            .map(|(col, _)| col)
            .collect()
    }

    pub fn sanitized_entries(&self) -> Vec<SanitizedEntry> {
        self.entries()
            .map(|entry| {
                let value = sanitize_value(entry.raw_value.as_deref());
                debug!("Sanitized value for key '{}': '{}'", entry.key, value);
                SanitizedEntry {
                    key: entry.key,
                    value,
                }
            })
            .collect()
    }
}

/// Pairs and sanitizes two rows of `rows`.
///
/// Returns an empty vector when either index is out of range. Duplicate keys
/// are kept in column order; the applier resolves them last-write-wins.
pub fn pair_and_sanitize(
    rows: &[Vec<String>],
    keys_row_index: usize,
    values_row_index: usize,
) -> Vec<SanitizedEntry> {
    RowPair::select(rows, keys_row_index, values_row_index)
        .map(|pair| pair.sanitized_entries())
        .unwrap_or_default()
}
