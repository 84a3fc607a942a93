//! Catalog service: the only component that composes store calls with
//! business rules.
//!
//! The service is stateless across calls; it holds nothing but the store
//! root. Every store touch goes through the broker, and every mutating
//! operation wraps its load-mutate-persist sequence in a single rusqlite
//! transaction: either the whole sequence commits before the call returns,
//! or nothing of it is visible. Read paths take no explicit transaction.
//!
//! `NotFound` and storage failures propagate unchanged to the boundary;
//! nothing is logged, swallowed, or substituted here.

use crate::catalog::item::{Item, ItemPatch, ItemRequest, NewItem};
use crate::catalog::mapper;
use crate::catalog::store;
use crate::core::broker::DbBroker;
use crate::core::db;
use crate::core::error::ShelfError;
use crate::core::page::{Page, PageRequest};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

pub struct CatalogService {
    root: PathBuf,
}

impl CatalogService {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    fn broker(&self) -> DbBroker {
        DbBroker::new(&db::data_dir(&self.root))
    }

    fn db_path(&self) -> PathBuf {
        db::catalog_db_path(&self.root)
    }

    /// The single authoritative not-found gate: every mutating operation
    /// resolves its target through this lookup.
    fn fetch_or_fail(conn: &Connection, id: i64) -> Result<Item, ShelfError> {
        store::find_by_id(conn, id)?.ok_or(ShelfError::NotFound(id))
    }

    /// Paginated scan of the whole catalog; the store's ordering, no
    /// filtering, no transformation.
    pub fn list(&self, request: &PageRequest) -> Result<Page<Item>, ShelfError> {
        self.broker()
            .with_conn(&self.db_path(), "shelf", "catalog.list", |conn| {
                store::ensure_schema(conn)?;
                store::scan_page(conn, request)
            })
    }

    /// Case-insensitive substring search on item names. The empty query
    /// matches everything.
    pub fn search(&self, query: &str, request: &PageRequest) -> Result<Page<Item>, ShelfError> {
        self.broker()
            .with_conn(&self.db_path(), "shelf", "catalog.search", |conn| {
                store::ensure_schema(conn)?;
                store::search_by_name(conn, query, request)
            })
    }

    /// Point lookup; fails with `NotFound` carrying the offending id.
    pub fn get_or_fail(&self, id: i64) -> Result<Item, ShelfError> {
        self.broker()
            .with_conn(&self.db_path(), "shelf", "catalog.get", |conn| {
                store::ensure_schema(conn)?;
                Self::fetch_or_fail(conn, id)
            })
    }

    /// Persist a new item; the store assigns the id.
    pub fn create(&self, item: &NewItem) -> Result<Item, ShelfError> {
        self.broker()
            .with_conn(&self.db_path(), "shelf", "catalog.create", |conn| {
                store::ensure_schema(conn)?;
                let tx = conn.transaction()?;
                let created = store::insert(&tx, item)?;
                tx.commit()?;
                Ok(created)
            })
    }

    /// Apply a partial patch to an existing item: absent fields keep their
    /// stored values. Load, merge, and persist run in one transaction.
    pub fn update(&self, id: i64, patch: &ItemPatch) -> Result<Item, ShelfError> {
        self.broker()
            .with_conn(&self.db_path(), "shelf", "catalog.update", |conn| {
                store::ensure_schema(conn)?;
                let tx = conn.transaction()?;
                let mut item = Self::fetch_or_fail(&tx, id)?;
                mapper::merge_into(&mut item, patch);
                let saved = store::save(&tx, &item)?;
                tx.commit()?;
                Ok(saved)
            })
    }

    /// Overwrite an existing item's name and price wholesale.
    pub fn replace(&self, id: i64, request: &ItemRequest) -> Result<Item, ShelfError> {
        self.broker()
            .with_conn(&self.db_path(), "shelf", "catalog.replace", |conn| {
                store::ensure_schema(conn)?;
                let tx = conn.transaction()?;
                let mut item = Self::fetch_or_fail(&tx, id)?;
                item.name = request.name.clone();
                item.price = request.price;
                let saved = store::save(&tx, &item)?;
                tx.commit()?;
                Ok(saved)
            })
    }

    /// Remove an item permanently. Deleting an absent id fails with
    /// `NotFound`; deletion is not idempotent at this layer.
    pub fn delete(&self, id: i64) -> Result<(), ShelfError> {
        self.broker()
            .with_conn(&self.db_path(), "shelf", "catalog.delete", |conn| {
                store::ensure_schema(conn)?;
                let tx = conn.transaction()?;
                let item = Self::fetch_or_fail(&tx, id)?;
                store::delete(&tx, &item)?;
                tx.commit()?;
                Ok(())
            })
    }
}
