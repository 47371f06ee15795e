//! # Fetching
//!
//! A fetcher turns a [`RangeSpec`] into rows of cell strings. Fetching is
//! fail-soft: nothing here returns an error to the caller. Every failure is
//! logged where it happens and reported as [`FetchOutcome::Failed`], so the
//! orchestrator can tell "nothing to do" apart from "something went wrong"
//! without either one aborting the host.

pub mod credentials;
pub mod google;

pub use credentials::ServiceAccountKey;
pub use google::GoogleSheetsFetcher;

use crate::errors::FetchError;
use crate::types::{RangeSpec, SheetRows};
use async_trait::async_trait;

/// The result of one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// At least one row came back.
    Rows(SheetRows),
    /// The request succeeded but the range holds no values.
    Empty,
    /// Credentials, auth, or transport failed.
    Failed(FetchError),
}

impl FetchOutcome {
    /// Collapses the outcome to rows, treating every failure as empty.
    pub fn into_rows(self) -> SheetRows {
        match self {
            FetchOutcome::Rows(rows) => rows,
            FetchOutcome::Empty | FetchOutcome::Failed(_) => Vec::new(),
        }
    }
}

/// A source of spreadsheet rows.
#[async_trait]
pub trait SheetFetcher: Send + Sync {
    /// Fetches `range`. Callers must have checked that both fields are non-empty.
    async fn fetch(&self, range: &RangeSpec) -> FetchOutcome;
}
