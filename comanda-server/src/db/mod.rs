//! redb-based persistence layer
//!
//! A single embedded database file holds every entity table plus the order
//! event stream. One writer at a time: redb write transactions serialize all
//! mutations, which is what lets the order manager run its whole
//! validate-apply-persist pipeline atomically.
//!
//! Entity rows are stored as JSON values keyed by id. Lookups that filter by
//! restaurant scan the table; at single-restaurant embedded scale this is
//! cheaper than maintaining secondary indices.

pub mod repository;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Shared database handle
#[derive(Clone)]
pub struct Db {
    inner: Arc<Database>,
}

impl Db {
    /// Open or create the database at the given path.
    ///
    /// redb commits with immediate durability by default: once `commit()`
    /// returns, the data survives power loss.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let db = Database::create(path)?;
        Ok(Self {
            inner: Arc::new(db),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> DbResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Ok(Self {
            inner: Arc::new(db),
        })
    }

    /// Begin a write transaction (blocks while another writer is active)
    pub fn begin_write(&self) -> DbResult<WriteTransaction> {
        Ok(self.inner.begin_write()?)
    }

    /// Raw database handle, for modules that manage their own tables
    pub(crate) fn database(&self) -> &Database {
        &self.inner
    }

    /// Insert or replace a JSON row
    pub fn insert_json<T: Serialize>(
        &self,
        table: TableDefinition<'static, &'static str, &'static [u8]>,
        key: &str,
        value: &T,
    ) -> DbResult<()> {
        let txn = self.begin_write()?;
        insert_json_txn(&txn, table, key, value)?;
        txn.commit()?;
        Ok(())
    }

    /// Fetch a JSON row by key
    pub fn fetch_json<T: DeserializeOwned>(
        &self,
        table: TableDefinition<'static, &'static str, &'static [u8]>,
        key: &str,
    ) -> DbResult<Option<T>> {
        let txn = self.inner.begin_read()?;
        let tbl = match txn.open_table(table) {
            Ok(t) => t,
            // Table not created yet: nothing stored
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match tbl.get(key)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Remove a row; returns whether it existed
    pub fn remove(
        &self,
        table: TableDefinition<'static, &'static str, &'static [u8]>,
        key: &str,
    ) -> DbResult<bool> {
        let txn = self.begin_write()?;
        let existed = {
            let mut tbl = txn.open_table(table)?;
            let existed = tbl.remove(key)?.is_some();
            existed
        };
        txn.commit()?;
        Ok(existed)
    }

    /// Scan every row of a table
    pub fn scan_json<T: DeserializeOwned>(
        &self,
        table: TableDefinition<'static, &'static str, &'static [u8]>,
    ) -> DbResult<Vec<T>> {
        let txn = self.inner.begin_read()?;
        let tbl = match txn.open_table(table) {
            Ok(t) => t,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut rows = Vec::new();
        for entry in tbl.iter()? {
            let (_, value) = entry?;
            rows.push(serde_json::from_slice(value.value())?);
        }
        Ok(rows)
    }
}

impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db").finish()
    }
}

/// Insert or replace a JSON row within an existing transaction
pub fn insert_json_txn<T: Serialize>(
    txn: &WriteTransaction,
    table: TableDefinition<'static, &'static str, &'static [u8]>,
    key: &str,
    value: &T,
) -> DbResult<()> {
    let bytes = serde_json::to_vec(value)?;
    let mut tbl = txn.open_table(table)?;
    tbl.insert(key, bytes.as_slice())?;
    Ok(())
}

/// Fetch a JSON row within an existing write transaction
pub fn fetch_json_txn<T: DeserializeOwned>(
    txn: &WriteTransaction,
    table: TableDefinition<'static, &'static str, &'static [u8]>,
    key: &str,
) -> DbResult<Option<T>> {
    let tbl = txn.open_table(table)?;
    let result = match tbl.get(key)? {
        Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
        None => Ok(None),
    };
    result
}

/// Scan every row of a table within an existing write transaction
pub fn scan_json_txn<T: DeserializeOwned>(
    txn: &WriteTransaction,
    table: TableDefinition<'static, &'static str, &'static [u8]>,
) -> DbResult<Vec<T>> {
    let tbl = txn.open_table(table)?;
    let mut rows = Vec::new();
    for entry in tbl.iter()? {
        let (_, value) = entry?;
        rows.push(serde_json::from_slice(value.value())?);
    }
    Ok(rows)
}

/// Remove a row within an existing transaction; returns whether it existed
pub fn remove_txn(
    txn: &WriteTransaction,
    table: TableDefinition<'static, &'static str, &'static [u8]>,
    key: &str,
) -> DbResult<bool> {
    let mut tbl = txn.open_table(table)?;
    let result = Ok(tbl.remove(key)?.is_some());
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("test_rows");

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Row {
        id: String,
        value: i64,
    }

    #[test]
    fn insert_fetch_roundtrip() {
        let db = Db::open_in_memory().unwrap();
        let row = Row {
            id: "r1".into(),
            value: 42,
        };
        db.insert_json(TEST_TABLE, "r1", &row).unwrap();
        let fetched: Option<Row> = db.fetch_json(TEST_TABLE, "r1").unwrap();
        assert_eq!(fetched, Some(row));
    }

    #[test]
    fn fetch_missing_table_is_none() {
        let db = Db::open_in_memory().unwrap();
        let fetched: Option<Row> = db.fetch_json(TEST_TABLE, "nope").unwrap();
        assert!(fetched.is_none());
        let rows: Vec<Row> = db.scan_json(TEST_TABLE).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn remove_reports_existence() {
        let db = Db::open_in_memory().unwrap();
        let row = Row {
            id: "r1".into(),
            value: 1,
        };
        db.insert_json(TEST_TABLE, "r1", &row).unwrap();
        assert!(db.remove(TEST_TABLE, "r1").unwrap());
        assert!(!db.remove(TEST_TABLE, "r1").unwrap());
    }
}
