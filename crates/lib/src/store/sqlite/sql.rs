//! # SQLite Statements
//!
//! SQL used by [`SqliteStore`](super::SqliteStore), kept apart from the
//! store logic.

pub const CREATE_OPTIONS_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS options (
        name TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
";

pub const CREATE_RECORDS_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS records (
        id INTEGER PRIMARY KEY,
        title TEXT NOT NULL,
        record_type TEXT NOT NULL DEFAULT 'page'
    );
";

pub const CREATE_RECORD_META_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS record_meta (
        record_id INTEGER NOT NULL,
        meta_key TEXT NOT NULL,
        meta_value TEXT NOT NULL,
        PRIMARY KEY (record_id, meta_key)
    );
";

/// Every statement needed to create the schema, in order.
pub const ALL_TABLE_CREATION_SQL: &[&str] = &[
    CREATE_OPTIONS_TABLE_SQL,
    CREATE_RECORDS_TABLE_SQL,
    CREATE_RECORD_META_TABLE_SQL,
];

pub const SELECT_OPTION_SQL: &str = "SELECT value FROM options WHERE name = ?";
pub const UPDATE_OPTION_SQL: &str = "UPDATE options SET value = ? WHERE name = ?";
pub const INSERT_OPTION_SQL: &str = "INSERT INTO options (name, value) VALUES (?, ?)";

pub const SELECT_RECORD_SQL: &str = "SELECT id FROM records WHERE id = ?";
pub const INSERT_RECORD_SQL: &str = "INSERT INTO records (id, title) VALUES (?, ?)";

pub const UPDATE_META_SQL: &str =
    "UPDATE record_meta SET meta_value = ? WHERE record_id = ? AND meta_key = ?";
pub const INSERT_META_SQL: &str =
    "INSERT INTO record_meta (record_id, meta_key, meta_value) VALUES (?, ?, ?)";
pub const SELECT_META_SQL: &str =
    "SELECT meta_key, meta_value FROM record_meta WHERE record_id = ? ORDER BY meta_key";
