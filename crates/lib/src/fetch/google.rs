//! # Google Sheets Fetcher
//!
//! Reads a range through the Sheets v4 `values.get` endpoint with read-only
//! service-account credentials.

use super::{FetchOutcome, SheetFetcher};
use crate::constants::SHEETS_READONLY_SCOPE;
use crate::errors::FetchError;
use crate::fetch::credentials::ServiceAccountKey;
use crate::types::{RangeSpec, SheetRows};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, warn};

/// The body of a `values.get` response. `values` is omitted for empty ranges.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Fetches rows from the Google Sheets REST API.
#[derive(Debug, Clone)]
pub struct GoogleSheetsFetcher {
    client: Client,
    credentials_path: PathBuf,
    api_base_url: String,
}

impl GoogleSheetsFetcher {
    /// Creates a fetcher whose requests give up after `timeout`.
    pub fn new(
        credentials_path: impl Into<PathBuf>,
        api_base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            credentials_path: credentials_path.into(),
            api_base_url: api_base_url.into(),
        })
    }

    /// Builds `{base}/v4/spreadsheets/{id}/values/{range}`, encoding each segment.
    fn values_url(&self, range: &RangeSpec) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.api_base_url).map_err(|e| {
            FetchError::Transport(format!("Invalid API base URL '{}': {e}", self.api_base_url))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                FetchError::Transport(format!(
                    "API base URL '{}' cannot carry a path",
                    self.api_base_url
                ))
            })?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                range.spreadsheet_id.as_str(),
                "values",
                range.range.as_str(),
            ]);
        url.query_pairs_mut().append_pair("majorDimension", "ROWS");
        Ok(url)
    }

    async fn try_fetch(&self, range: &RangeSpec) -> Result<SheetRows, FetchError> {
        let key = ServiceAccountKey::from_file(&self.credentials_path)?;
        let token = key
            .fetch_access_token(&self.client, SHEETS_READONLY_SCOPE)
            .await?;

        info!("Fetching data from range: {}", range.range);
        let response = self
            .client
            .get(self.values_url(range)?)
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        let value_range: ValueRange = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        Ok(value_range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }
}

fn cell_to_string(cell: Value) -> String {
    match cell {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl SheetFetcher for GoogleSheetsFetcher {
    async fn fetch(&self, range: &RangeSpec) -> FetchOutcome {
        match self.try_fetch(range).await {
            Ok(rows) if rows.is_empty() => {
                warn!("No data found in the specified range.");
                FetchOutcome::Empty
            }
            Ok(rows) => {
                info!("Data fetched successfully ({} row(s)).", rows.len());
                FetchOutcome::Rows(rows)
            }
            Err(e) => {
                error!("Error fetching data - {e}");
                FetchOutcome::Failed(e)
            }
        }
    }
}
