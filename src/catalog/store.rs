//! SQLite-backed item store.
//!
//! These conn-scoped functions are the storage capability contract the
//! service composes: insert with store-assigned id, point lookup, upsert,
//! delete, paginated scan, and paginated case-insensitive substring search
//! on the name column. Callers obtain the connection through
//! [`DbBroker::with_conn`](crate::core::broker::DbBroker::with_conn) and
//! own any transaction scoping; nothing here commits or rolls back.
//!
//! Prices are persisted as integer minor units (`price_cents`), an exact
//! fixed-point encoding that also sorts numerically without casts.

use crate::catalog::item::{Item, NewItem};
use crate::core::error::ShelfError;
use crate::core::page::{Page, PageRequest};
use crate::core::schemas;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Idempotent schema bootstrap; runs at the start of every broker closure.
pub fn ensure_schema(conn: &Connection) -> Result<(), ShelfError> {
    conn.execute(schemas::CATALOG_DB_SCHEMA_META, [])?;
    conn.execute(schemas::CATALOG_DB_SCHEMA_ITEMS, [])?;
    conn.execute(schemas::CATALOG_DB_SCHEMA_NAME_INDEX, [])?;

    let version: Option<String> = conn
        .query_row(
            "SELECT value FROM meta WHERE key = 'schema_version'",
            [],
            |row| row.get(0),
        )
        .optional()
        .map_err(ShelfError::RusqliteError)?;

    match version {
        None => {
            conn.execute(
                "INSERT INTO meta(key, value) VALUES('schema_version', ?1)
                 ON CONFLICT(key) DO UPDATE SET value=excluded.value",
                params![schemas::CATALOG_SCHEMA_VERSION.to_string()],
            )?;
            Ok(())
        }
        Some(v) if v == schemas::CATALOG_SCHEMA_VERSION.to_string() => Ok(()),
        Some(v) => Err(ShelfError::DatabaseInitializationError(format!(
            "unsupported schema version {} (expected {})",
            v,
            schemas::CATALOG_SCHEMA_VERSION
        ))),
    }
}

/// Insert a new item; the store assigns the id.
pub fn insert(conn: &Connection, item: &NewItem) -> Result<Item, ShelfError> {
    let cents = price_to_cents(item.price)?;
    conn.execute(
        "INSERT INTO items(name, price_cents) VALUES(?1, ?2)",
        params![item.name, cents],
    )?;
    Ok(Item {
        id: conn.last_insert_rowid(),
        name: item.name.clone(),
        price: cents_to_price(cents),
    })
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Item>, ShelfError> {
    conn.query_row(
        "SELECT id, name, price_cents FROM items WHERE id = ?1",
        params![id],
        item_from_row,
    )
    .optional()
    .map_err(ShelfError::RusqliteError)
}

/// Persist an item under its existing id (upsert semantics).
pub fn save(conn: &Connection, item: &Item) -> Result<Item, ShelfError> {
    let cents = price_to_cents(item.price)?;
    conn.execute(
        "INSERT INTO items(id, name, price_cents) VALUES(?1, ?2, ?3)
         ON CONFLICT(id) DO UPDATE SET name = excluded.name, price_cents = excluded.price_cents",
        params![item.id, item.name, cents],
    )?;
    Ok(Item {
        id: item.id,
        name: item.name.clone(),
        price: cents_to_price(cents),
    })
}

/// Remove an item; fails with `NotFound` when the id is absent.
pub fn delete(conn: &Connection, item: &Item) -> Result<(), ShelfError> {
    let changed = conn.execute("DELETE FROM items WHERE id = ?1", params![item.id])?;
    if changed == 0 {
        return Err(ShelfError::NotFound(item.id));
    }
    Ok(())
}

/// Paginated full scan. The trailing `id ASC` tiebreak keeps the ordering
/// stable for a fixed dataset and identical request.
pub fn scan_page(conn: &Connection, request: &PageRequest) -> Result<Page<Item>, ShelfError> {
    let total: i64 = conn.query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))?;

    let sql = format!(
        "SELECT id, name, price_cents FROM items ORDER BY {} {}, id ASC LIMIT ?1 OFFSET ?2",
        request.sort.column(),
        request.direction.keyword()
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![request.size, request.offset() as i64])?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(item_from_row(row)?);
    }
    Ok(Page::new(items, request, total as u64))
}

/// Paginated case-insensitive substring search on the name column.
///
/// LIKE metacharacters in the query are escaped, so matching is pure
/// containment: an item matches iff `lower(name)` contains `lower(query)`.
/// The empty query matches every row. Case folding is ASCII, matching
/// SQLite's `lower()`.
pub fn search_by_name(
    conn: &Connection,
    query: &str,
    request: &PageRequest,
) -> Result<Page<Item>, ShelfError> {
    let pattern = format!("%{}%", escape_like(&query.to_ascii_lowercase()));

    let total: i64 = conn.query_row(
        "SELECT COUNT(*) FROM items WHERE lower(name) LIKE ?1 ESCAPE '\\'",
        params![pattern],
        |row| row.get(0),
    )?;

    let sql = format!(
        "SELECT id, name, price_cents FROM items WHERE lower(name) LIKE ?1 ESCAPE '\\'
         ORDER BY {} {}, id ASC LIMIT ?2 OFFSET ?3",
        request.sort.column(),
        request.direction.keyword()
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![pattern, request.size, request.offset() as i64])?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(item_from_row(row)?);
    }
    Ok(Page::new(items, request, total as u64))
}

fn item_from_row(row: &rusqlite::Row) -> rusqlite::Result<Item> {
    let cents: i64 = row.get(2)?;
    Ok(Item {
        id: row.get(0)?,
        name: row.get(1)?,
        price: cents_to_price(cents),
    })
}

/// Escape LIKE metacharacters so a query string matches literally.
fn escape_like(query: &str) -> String {
    let mut out = String::with_capacity(query.len());
    for ch in query.chars() {
        if ch == '\\' || ch == '%' || ch == '_' {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Exact conversion to integer minor units. Refuses sub-cent precision and
/// out-of-range magnitudes instead of rounding.
pub(crate) fn price_to_cents(price: Decimal) -> Result<i64, ShelfError> {
    let cents = (price * Decimal::ONE_HUNDRED).normalize();
    if cents.scale() != 0 {
        return Err(ShelfError::ValidationError(format!(
            "price {} has sub-cent precision",
            price
        )));
    }
    cents.to_i64().ok_or_else(|| {
        ShelfError::ValidationError(format!("price {} is out of range", price))
    })
}

pub(crate) fn cents_to_price(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}
