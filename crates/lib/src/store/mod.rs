//! # Host Content Store
//!
//! The pipeline touches the host system through the [`MetaStore`] trait: it
//! reads options, checks that the target record exists, and upserts metadata.
//! It never creates or deletes records.

pub mod sqlite;

pub use sqlite::SqliteStore;

use crate::errors::StoreError;
use async_trait::async_trait;

/// The host operations the sync pipeline and its settings surface use.
#[async_trait]
pub trait MetaStore: Send + Sync {
    /// Reads an option. `None` means the option was never stored.
    async fn get_option(&self, name: &str) -> Result<Option<String>, StoreError>;

    async fn set_option(&self, name: &str, value: &str) -> Result<(), StoreError>;

    async fn record_exists(&self, record_id: i64) -> Result<bool, StoreError>;

    /// Sets `key` on `record_id`, replacing any existing value for that key.
    async fn upsert_meta(&self, record_id: i64, key: &str, value: &str)
        -> Result<(), StoreError>;

    /// All metadata on `record_id`, ordered by key.
    async fn list_meta(&self, record_id: i64) -> Result<Vec<(String, String)>, StoreError>;
}
