//! # Sync Pipeline Tests
//!
//! Exercises `run_sync` end to end against an in-memory content store, with
//! both the mock fetcher and the real Sheets fetcher behind an HTTP mock.

use anyhow::Result;
use async_trait::async_trait;
use httpmock::{Method, MockServer};
use serde_json::json;
use sheetmeta::{
    run_sync, run_sync_with, FetchError, FetchOutcome, GoogleSheetsFetcher, MetaStore,
    RangeSpec, SkipReason, SqliteStore, StoreError, SyncConfig, SyncError, SyncOutcome,
};
use sheetmeta_test_utils::{write_service_account_key, MockFetcher, TestSetup};
use std::time::Duration;
use tempfile::tempdir;

const FRONT_PAGE: i64 = 10;

async fn configured_setup() -> Result<TestSetup> {
    TestSetup::new()
        .await?
        .with_settings("sheet-123", "Sheet1!D1:BA2")
        .await?
        .with_front_page(FRONT_PAGE)
        .await
}

fn meta(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn test_sync_writes_non_empty_columns() -> Result<()> {
    let setup = configured_setup().await?;
    let fetcher = MockFetcher::with_rows(&[
        &["title", "", "subtitle"],
        &["Home", "ignored", "https://example.com/x"],
    ]);

    let outcome = run_sync(&setup.store, &fetcher).await?;

    let SyncOutcome::Applied(report) = outcome else {
        panic!("Expected the sync to apply, got {outcome:?}");
    };
    assert_eq!(report.target_record_id, FRONT_PAGE);
    assert_eq!(report.rows_fetched, 2);
    assert_eq!(report.entries_applied, 2);
    assert_eq!(report.skipped_columns, vec![1]);

    assert_eq!(
        setup.store.list_meta(FRONT_PAGE).await?,
        meta(&[("subtitle", "https://example.com/x"), ("title", "Home")])
    );
    assert_eq!(
        fetcher.get_calls(),
        vec![RangeSpec::new("sheet-123", "Sheet1!D1:BA2")]
    );
    Ok(())
}

#[tokio::test]
async fn test_sync_duplicate_keys_last_write_wins() -> Result<()> {
    let setup = configured_setup().await?;
    let fetcher = MockFetcher::with_rows(&[&["k1", "k1"], &["a", "b"]]);

    let outcome = run_sync(&setup.store, &fetcher).await?;

    assert_eq!(outcome.writes(), 2);
    assert_eq!(setup.store.list_meta(FRONT_PAGE).await?, meta(&[("k1", "b")]));
    Ok(())
}

#[tokio::test]
async fn test_sync_overwrites_previous_values() -> Result<()> {
    let setup = configured_setup().await?;
    setup.store.upsert_meta(FRONT_PAGE, "title", "Stale").await?;
    setup.store.upsert_meta(FRONT_PAGE, "untouched", "Kept").await?;
    let fetcher = MockFetcher::with_rows(&[&["title"], &["Fresh"]]);

    run_sync(&setup.store, &fetcher).await?;

    assert_eq!(
        setup.store.list_meta(FRONT_PAGE).await?,
        meta(&[("title", "Fresh"), ("untouched", "Kept")])
    );
    Ok(())
}

#[tokio::test]
async fn test_sync_with_empty_fetch_writes_nothing() -> Result<()> {
    let setup = configured_setup().await?;
    let fetcher = MockFetcher::new(FetchOutcome::Empty);

    let outcome = run_sync(&setup.store, &fetcher).await?;

    assert_eq!(outcome, SyncOutcome::Skipped(SkipReason::NoData));
    assert_eq!(outcome.writes(), 0);
    assert!(setup.store.list_meta(FRONT_PAGE).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_sync_with_failed_fetch_writes_nothing() -> Result<()> {
    let setup = configured_setup().await?;
    let fetcher = MockFetcher::new(FetchOutcome::Failed(FetchError::Transport(
        "operation timed out".to_string(),
    )));

    let outcome = run_sync(&setup.store, &fetcher).await?;

    match outcome {
        SyncOutcome::Skipped(SkipReason::FetchFailed(reason)) => {
            assert!(reason.contains("operation timed out"))
        }
        other => panic!("Expected a fetch failure skip, got {other:?}"),
    }
    assert!(setup.store.list_meta(FRONT_PAGE).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_sync_with_single_row_writes_nothing() -> Result<()> {
    let setup = configured_setup().await?;
    let fetcher = MockFetcher::with_rows(&[&["title", "subtitle"]]);

    let outcome = run_sync(&setup.store, &fetcher).await?;

    assert_eq!(
        outcome,
        SyncOutcome::Skipped(SkipReason::RowsOutOfRange { rows: 1 })
    );
    assert!(setup.store.list_meta(FRONT_PAGE).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_sync_without_spreadsheet_id_never_fetches() -> Result<()> {
    let setup = TestSetup::new().await?.with_front_page(FRONT_PAGE).await?;
    let fetcher = MockFetcher::with_rows(&[&["title"], &["Home"]]);

    let outcome = run_sync(&setup.store, &fetcher).await?;

    assert_eq!(outcome, SyncOutcome::Skipped(SkipReason::MissingSpreadsheetId));
    assert!(fetcher.get_calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_sync_without_front_page_never_fetches() -> Result<()> {
    let setup = TestSetup::new()
        .await?
        .with_settings("sheet-123", "Sheet1!D1:BA2")
        .await?;
    let fetcher = MockFetcher::with_rows(&[&["title"], &["Home"]]);

    let outcome = run_sync(&setup.store, &fetcher).await?;

    assert_eq!(outcome, SyncOutcome::Skipped(SkipReason::NoFrontPage));
    assert!(fetcher.get_calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_sync_uses_default_range_when_unset() -> Result<()> {
    let setup = TestSetup::new().await?.with_front_page(FRONT_PAGE).await?;
    setup
        .store
        .set_option(sheetmeta::constants::OPTION_SPREADSHEET_ID, "sheet-9")
        .await?;
    let fetcher = MockFetcher::with_rows(&[&["title"], &["Home"]]);

    run_sync(&setup.store, &fetcher).await?;

    assert_eq!(
        fetcher.get_calls(),
        vec![RangeSpec::new("sheet-9", "Sheet1!D1:BA2")]
    );
    Ok(())
}

/// A store that refuses to write one particular key.
struct RefusingStore {
    inner: SqliteStore,
    refused_key: &'static str,
}

#[async_trait]
impl MetaStore for RefusingStore {
    async fn get_option(&self, name: &str) -> Result<Option<String>, StoreError> {
        self.inner.get_option(name).await
    }

    async fn set_option(&self, name: &str, value: &str) -> Result<(), StoreError> {
        self.inner.set_option(name, value).await
    }

    async fn record_exists(&self, record_id: i64) -> Result<bool, StoreError> {
        self.inner.record_exists(record_id).await
    }

    async fn upsert_meta(
        &self,
        record_id: i64,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        if key == self.refused_key {
            return Err(StoreError::DataIntegrity(format!("refused key '{key}'")));
        }
        self.inner.upsert_meta(record_id, key, value).await
    }

    async fn list_meta(&self, record_id: i64) -> Result<Vec<(String, String)>, StoreError> {
        self.inner.list_meta(record_id).await
    }
}

#[tokio::test]
async fn test_write_failure_propagates_without_rollback() -> Result<()> {
    let setup = configured_setup().await?;
    let store = RefusingStore {
        inner: setup.store.clone(),
        refused_key: "b",
    };
    let fetcher = MockFetcher::with_rows(&[&["a", "b", "c"], &["1", "2", "3"]]);

    let result = run_sync(&store, &fetcher).await;

    assert!(matches!(
        result,
        Err(SyncError::Store(StoreError::DataIntegrity(_)))
    ));
    // The write before the failure stays; the one after never happens.
    assert_eq!(setup.store.list_meta(FRONT_PAGE).await?, meta(&[("a", "1")]));
    Ok(())
}

#[tokio::test]
async fn test_run_sync_with_explicit_config() -> Result<()> {
    let setup = TestSetup::new().await?.with_front_page(FRONT_PAGE).await?;
    let config = SyncConfig {
        range: RangeSpec::new("other-sheet", "Data!A1:B2"),
        target_record_id: FRONT_PAGE,
    };
    let fetcher = MockFetcher::with_rows(&[&["x"], &["y"]]);

    run_sync_with(&config, &setup.store, &fetcher).await?;

    assert_eq!(fetcher.get_calls(), vec![config.range.clone()]);
    assert_eq!(setup.store.list_meta(FRONT_PAGE).await?, meta(&[("x", "y")]));
    Ok(())
}

#[tokio::test]
async fn test_sync_against_sheets_api_mock() -> Result<()> {
    // --- 1. Arrange & Setup ---
    let setup = configured_setup().await?;
    let server = MockServer::start();
    let dir = tempdir()?;
    let key_path = write_service_account_key(dir.path(), &server.url("/token"))?;

    server.mock(|when, then| {
        when.method(Method::POST).path("/token");
        then.status(200)
            .json_body(json!({ "access_token": "test-token" }));
    });
    let values_mock = server.mock(|when, then| {
        when.method(Method::GET)
            .path("/v4/spreadsheets/sheet-123/values/Sheet1!D1:BA2");
        then.status(200).json_body(json!({
            "values": [
                ["hero_title", "hero_link", "", "hero_note"],
                ["<h1>Welcome</h1>", "https://example.com/start", "x"]
            ]
        }));
    });

    let fetcher =
        GoogleSheetsFetcher::new(&key_path, server.base_url(), Duration::from_secs(5))?;

    // --- 2. Act ---
    let outcome = run_sync(&setup.store, &fetcher).await?;

    // --- 3. Assert ---
    assert_eq!(outcome.writes(), 3);
    assert_eq!(
        setup.store.list_meta(FRONT_PAGE).await?,
        meta(&[
            ("hero_link", "https://example.com/start"),
            ("hero_note", ""),
            ("hero_title", "Welcome"),
        ])
    );
    values_mock.assert_hits(1);
    Ok(())
}
