//! # Pipeline Types
//!
//! The values that flow between the fetch, pairing, and apply stages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies the slice of a spreadsheet to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeSpec {
    pub spreadsheet_id: String,
    /// An A1-notation range, e.g. `Sheet1!D1:BA2`.
    pub range: String,
}

impl RangeSpec {
    pub fn new(spreadsheet_id: impl Into<String>, range: impl Into<String>) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            range: range.into(),
        }
    }
}

/// Row-major cell values as returned by the Sheets API.
pub type SheetRows = Vec<Vec<String>>;

/// One keys-row cell paired with the values-row cell in the same column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaEntry {
    pub key: String,
    /// `None` when the values row ends before this column.
    pub raw_value: Option<String>,
}

/// A metadata entry whose value is ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SanitizedEntry {
    pub key: String,
    pub value: String,
}

impl SanitizedEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Everything one run needs, resolved once before the pipeline starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub range: RangeSpec,
    /// The record that receives the metadata.
    pub target_record_id: i64,
}

/// A summary of a run that reached the apply stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub target_record_id: i64,
    /// Number of rows returned by the fetch.
    pub rows_fetched: usize,
    /// Number of upserts performed, duplicates included.
    pub entries_applied: usize,
    /// Column positions skipped because their key cell was empty.
    pub skipped_columns: Vec<usize>,
}

/// Why a run ended without writing anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingSpreadsheetId,
    MissingRange,
    NoFrontPage,
    /// `page_on_front` names a record that does not exist.
    FrontPageNotFound(i64),
    /// The fetch succeeded but the range held no values.
    NoData,
    FetchFailed(String),
    RowsOutOfRange { rows: usize },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingSpreadsheetId => write!(f, "Spreadsheet ID is not configured."),
            SkipReason::MissingRange => write!(f, "Range is not configured."),
            SkipReason::NoFrontPage => write!(f, "No front page set."),
            SkipReason::FrontPageNotFound(id) => {
                write!(f, "Front page record {id} does not exist.")
            }
            SkipReason::NoData => write!(f, "No data found in the specified range."),
            SkipReason::FetchFailed(reason) => write!(f, "Unable to fetch data: {reason}"),
            SkipReason::RowsOutOfRange { rows } => write!(
                f,
                "Row indices out of range in fetched data ({rows} row(s) fetched)."
            ),
        }
    }
}

/// The result of a run that did not hit a storage error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Applied(SyncReport),
    Skipped(SkipReason),
}

impl SyncOutcome {
    /// Number of metadata writes the run performed.
    pub fn writes(&self) -> usize {
        match self {
            SyncOutcome::Applied(report) => report.entries_applied,
            SyncOutcome::Skipped(_) => 0,
        }
    }
}
