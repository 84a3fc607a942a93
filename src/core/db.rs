use crate::catalog::store;
use crate::core::broker::DbBroker;
use crate::core::error;
use crate::core::schemas;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

pub fn db_connect(db_path: &str) -> Result<Connection, error::ShelfError> {
    let conn = Connection::open(db_path)?;
    conn.busy_timeout(std::time::Duration::from_secs(5))
        .map_err(error::ShelfError::RusqliteError)?;
    conn.query_row("PRAGMA journal_mode=WAL;", [], |_| Ok(()))
        .map_err(error::ShelfError::RusqliteError)?;
    conn.execute("PRAGMA foreign_keys=ON;", [])
        .map_err(error::ShelfError::RusqliteError)?;
    Ok(conn)
}

/// Store root data directory, `<root>/.shelf/data`.
pub fn data_dir(root: &Path) -> PathBuf {
    root.join(".shelf").join("data")
}

pub fn catalog_db_path(root: &Path) -> PathBuf {
    data_dir(root).join(schemas::CATALOG_DB_NAME)
}

/// Create the catalog database and its schema. Idempotent.
pub fn initialize_catalog_db(root: &Path) -> Result<PathBuf, error::ShelfError> {
    let db_path = catalog_db_path(root);
    let parent_dir = db_path.parent().ok_or_else(|| {
        error::ShelfError::DatabaseInitializationError(format!(
            "no parent directory for {}",
            db_path.display()
        ))
    })?;
    fs::create_dir_all(parent_dir).map_err(error::ShelfError::IoError)?;

    let broker = DbBroker::new(&data_dir(root));
    broker.with_conn(&db_path, "shelf", "catalog.init", |conn| {
        store::ensure_schema(conn)?;
        Ok(())
    })?;

    Ok(db_path)
}
