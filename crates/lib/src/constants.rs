//! # Shared Constants
//!
//! Option names, defaults, and fixed row positions shared by the library and
//! the `sheetmeta` binary.

/// Option holding the ID of the spreadsheet to read.
pub const OPTION_SPREADSHEET_ID: &str = "sheet_to_meta_spreadsheet_id";

/// Option holding the A1-notation range to read.
pub const OPTION_RANGE: &str = "sheet_to_meta_range";

/// Host-owned option naming the record used as the front page.
pub const OPTION_FRONT_PAGE: &str = "page_on_front";

/// The range used when no range option has ever been stored.
pub const DEFAULT_RANGE: &str = "Sheet1!D1:BA2";

/// Position of the metadata keys row within the fetched range.
pub const KEYS_ROW_INDEX: usize = 0;

/// Position of the metadata values row within the fetched range.
pub const VALUES_ROW_INDEX: usize = 1;

/// The default path for the host content database.
pub const DEFAULT_DB_FILE: &str = "db/sheetmeta.db";

/// File name of the service-account credential, resolved beside the executable.
pub const CREDENTIALS_FILE_NAME: &str = "service-account-key.json";

/// Base URL of the Google Sheets REST API.
pub const DEFAULT_SHEETS_API_BASE_URL: &str = "https://sheets.googleapis.com";

/// Token endpoint used when the credential file does not name one.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// OAuth scope granting read-only access to spreadsheets.
pub const SHEETS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";
