//! # sheetmeta
//!
//! Synchronizes two rows of a Google Sheets range into key/value metadata on
//! the host's front page record. One call to [`run_sync`] performs a single
//! fetch → pair/sanitize → apply cycle:
//!
//! 1. a [`SheetFetcher`] reads the configured range,
//! 2. [`pair_and_sanitize`] zips the keys row with the values row,
//! 3. [`apply`](apply::apply) upserts each entry on the target record.

pub mod apply;
pub mod constants;
pub mod errors;
pub mod fetch;
pub mod pairing;
pub mod sanitize;
pub mod settings;
pub mod store;
pub mod sync;
pub mod types;

pub use errors::{FetchError, StoreError, SyncError};
pub use fetch::{FetchOutcome, GoogleSheetsFetcher, SheetFetcher};
pub use pairing::{pair_and_sanitize, RowPair};
pub use settings::{save_settings, set_front_page, SyncSettings};
pub use store::{MetaStore, SqliteStore};
pub use sync::{run_sync, run_sync_with};
pub use types::{
    MetaEntry, RangeSpec, SanitizedEntry, SheetRows, SkipReason, SyncConfig, SyncOutcome,
    SyncReport,
};
