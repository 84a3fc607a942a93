//! Database schema definitions for the catalog store.
//!
//! Shelf keeps all state in a single SQLite database, `catalog.db`, under
//! the store root. Item ids are assigned by SQLite (`AUTOINCREMENT`) and
//! are never reused after deletion. Prices are persisted as integer minor
//! units (cents), an exact fixed-point encoding of NUMERIC(12,2).

pub const CATALOG_DB_NAME: &str = "catalog.db";
pub const CATALOG_SCHEMA_VERSION: u32 = 1;

pub const CATALOG_DB_SCHEMA_META: &str = "
    CREATE TABLE IF NOT EXISTS meta (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )
";

pub const CATALOG_DB_SCHEMA_ITEMS: &str = "
    CREATE TABLE IF NOT EXISTS items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        price_cents INTEGER NOT NULL
    )
";

pub const CATALOG_DB_SCHEMA_NAME_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_items_name ON items(name)";
