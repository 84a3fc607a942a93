use rusqlite;
use std::io;
use thiserror::Error;

/// Failure taxonomy for the catalog core.
///
/// `NotFound` and validation failures are recoverable by the caller; SQLite
/// and I/O failures are fatal for the call that raised them. Translation to
/// user-visible output happens at the CLI boundary, never here.
#[derive(Error, Debug)]
pub enum ShelfError {
    #[error("SQLite error: {0}")]
    RusqliteError(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("Failed to initialize catalog database: {0}")]
    DatabaseInitializationError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Item not found with id: {0}")]
    NotFound(i64),
}
