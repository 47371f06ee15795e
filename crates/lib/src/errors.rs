use std::path::PathBuf;
use thiserror::Error;

/// Reasons a fetch did not produce rows.
///
/// These never escape the pipeline; they are logged and folded into
/// `FetchOutcome::Failed` so a run can end as a no-op.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Service account key file not found at '{}'", .0.display())]
    CredentialsMissing(PathBuf),
    #[error("Service account key file is invalid: {0}")]
    CredentialsInvalid(String),
    #[error("Failed to obtain an access token: {0}")]
    Auth(String),
    #[error("Request to the Sheets API failed: {0}")]
    Transport(String),
    #[error("Sheets API responded with {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Failed to decode the Sheets API response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport(err.to_string())
    }
}

/// Errors raised by the host content store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] turso::Error),
    #[error("Failed to get database connection: {0}")]
    Connection(String),
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),
}

/// The only failures that escape `run_sync`.
///
/// Configuration gaps and fetch failures end the run as a
/// [`SyncOutcome::Skipped`](crate::types::SyncOutcome) instead.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Metadata store error: {0}")]
    Store(#[from] StoreError),
}
