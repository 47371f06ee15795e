use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use sheetmeta::{FetchOutcome, RangeSpec, SheetFetcher, SheetRows, SqliteStore};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// An RSA key used only to sign assertions against mock token endpoints.
pub const TEST_PRIVATE_KEY_PEM: &str = include_str!("../fixtures/test-service-account-key.pem");

/// The public half of [`TEST_PRIVATE_KEY_PEM`], for verifying signed assertions.
pub const TEST_PUBLIC_KEY_PEM: &str = include_str!("../fixtures/test-service-account-key.pub.pem");

pub const TEST_CLIENT_EMAIL: &str = "sheet-sync@test-project.iam.gserviceaccount.com";

// --- Test Setup ---

/// A helper struct to manage store creation for each test.
pub struct TestSetup {
    pub store: SqliteStore,
}

impl TestSetup {
    /// Creates a new, isolated in-memory store and initializes the schema.
    pub async fn new() -> Result<Self> {
        let store = SqliteStore::new(":memory:").await?;
        store.initialize_schema().await?;
        Ok(Self { store })
    }

    /// Adds a record and points the front page option at it.
    pub async fn with_front_page(self, record_id: i64) -> Result<Self> {
        self.store.insert_record(record_id, "Home").await?;
        sheetmeta::set_front_page(&self.store, record_id).await?;
        Ok(self)
    }

    /// Stores spreadsheet settings the way the settings command does.
    pub async fn with_settings(self, spreadsheet_id: &str, range: &str) -> Result<Self> {
        sheetmeta::save_settings(&self.store, spreadsheet_id, range).await?;
        Ok(self)
    }
}

// --- Mock Fetcher ---

/// A fetcher that returns a pre-programmed outcome and records each request.
#[derive(Clone, Debug)]
pub struct MockFetcher {
    outcome: Arc<Mutex<FetchOutcome>>,
    calls: Arc<Mutex<Vec<RangeSpec>>>,
}

impl MockFetcher {
    pub fn new(outcome: FetchOutcome) -> Self {
        Self {
            outcome: Arc::new(Mutex::new(outcome)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A fetcher that returns `rows` verbatim.
    pub fn with_rows(rows: &[&[&str]]) -> Self {
        Self::new(FetchOutcome::Rows(rows_from(rows)))
    }

    /// Retrieves the recorded requests for assertion.
    pub fn get_calls(&self) -> Vec<RangeSpec> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SheetFetcher for MockFetcher {
    async fn fetch(&self, range: &RangeSpec) -> FetchOutcome {
        self.calls.lock().unwrap().push(range.clone());
        self.outcome.lock().unwrap().clone()
    }
}

// --- Test-Specific Helpers ---

/// Builds owned rows from string slices.
pub fn rows_from(rows: &[&[&str]]) -> SheetRows {
    rows.iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

/// Writes a service-account key file into `dir` whose token endpoint is `token_uri`.
pub fn write_service_account_key(dir: &Path, token_uri: &str) -> Result<PathBuf> {
    let key = json!({
        "type": "service_account",
        "project_id": "test-project",
        "private_key_id": "test-key-id",
        "private_key": TEST_PRIVATE_KEY_PEM,
        "client_email": TEST_CLIENT_EMAIL,
        "token_uri": token_uri,
    });
    let path = dir.join("service-account-key.json");
    fs::write(&path, serde_json::to_string_pretty(&key)?)?;
    Ok(path)
}
