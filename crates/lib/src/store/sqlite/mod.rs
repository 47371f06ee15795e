use super::MetaStore;
use crate::errors::StoreError;
use async_trait::async_trait;
use std::fmt::{self, Debug};
use tracing::{debug, info};
use turso::{params, Connection, Database};

pub mod sql;

/// A host content store backed by a local SQLite database through Turso.
///
/// Cloning shares the underlying database, so a clone of a `:memory:` store
/// sees the same data.
#[derive(Clone)]
pub struct SqliteStore {
    pub db: Database,
}

impl SqliteStore {
    /// Opens (or creates) the database at `db_path`. Use `":memory:"` for an
    /// isolated in-memory database.
    pub async fn new(db_path: &str) -> Result<Self, StoreError> {
        let db = turso::Builder::new_local(db_path)
            .build()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(Self { db })
    }

    /// Wraps an already-open database.
    pub fn from_database(db: Database) -> Self {
        Self { db }
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        self.db
            .connect()
            .map_err(|e| StoreError::Connection(e.to_string()))
    }

    /// Creates the tables if they are missing. Safe to call on every start.
    pub async fn initialize_schema(&self) -> Result<(), StoreError> {
        let conn = self.connect()?;
        for statement in sql::ALL_TABLE_CREATION_SQL {
            conn.execute(statement, ()).await?;
        }
        info!("Content store schema is ready.");
        Ok(())
    }

    /// A helper for tests to pre-populate data by executing multiple SQL statements.
    pub async fn initialize_with_data(&self, init_sql: &str) -> Result<(), StoreError> {
        let conn = self.connect()?;
        for statement in init_sql.split(';').filter(|s| !s.trim().is_empty()) {
            conn.execute(statement, ()).await?;
        }
        Ok(())
    }

    /// Adds a content record with an explicit id.
    pub async fn insert_record(&self, record_id: i64, title: &str) -> Result<(), StoreError> {
        let conn = self.connect()?;
        conn.execute(sql::INSERT_RECORD_SQL, params![record_id, title])
            .await?;
        Ok(())
    }
}

impl Debug for SqliteStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl MetaStore for SqliteStore {
    async fn get_option(&self, name: &str) -> Result<Option<String>, StoreError> {
        let conn = self.connect()?;
        let mut rows = conn.query(sql::SELECT_OPTION_SQL, params![name]).await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row.get::<String>(0)?)),
            None => Ok(None),
        }
    }

    async fn set_option(&self, name: &str, value: &str) -> Result<(), StoreError> {
        let conn = self.connect()?;
        let mut update = conn.prepare(sql::UPDATE_OPTION_SQL).await?;
        let changes = update.execute(params![value, name]).await?;
        if changes == 0 {
            conn.execute(sql::INSERT_OPTION_SQL, params![name, value])
                .await?;
        }
        debug!("Option '{name}' set.");
        Ok(())
    }

    async fn record_exists(&self, record_id: i64) -> Result<bool, StoreError> {
        let conn = self.connect()?;
        let mut rows = conn.query(sql::SELECT_RECORD_SQL, params![record_id]).await?;
        Ok(rows.next().await?.is_some())
    }

    async fn upsert_meta(
        &self,
        record_id: i64,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        let conn = self.connect()?;
        let mut update = conn.prepare(sql::UPDATE_META_SQL).await?;
        let changes = update.execute(params![value, record_id, key]).await?;
        if changes == 0 {
            conn.execute(sql::INSERT_META_SQL, params![record_id, key, value])
                .await?;
        }
        Ok(())
    }

    async fn list_meta(&self, record_id: i64) -> Result<Vec<(String, String)>, StoreError> {
        let conn = self.connect()?;
        let mut rows = conn.query(sql::SELECT_META_SQL, params![record_id]).await?;
        let mut meta = Vec::new();
        while let Some(row) = rows.next().await? {
            meta.push((row.get::<String>(0)?, row.get::<String>(1)?));
        }
        Ok(meta)
    }
}
