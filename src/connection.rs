//! DuckDB connection wrapper with schema bootstrap, query execution and
//! transactional units of work.
//!
//! Reads go through [`Connection::execute`] / [`Connection::execute_into`],
//! which convert DuckDB rows to `serde_json` maps so models can be decoded
//! with serde. Writes that must land together go through a [`UnitOfWork`].

use crate::error::{DeckError, Result};
use duckdb::types::{Value, ValueRef};
use duckdb::{Connection as DuckDbConnection, Params, ToSql};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Tables and sequences for the card catalog and the stored decks.
///
/// DuckDB has no cascading foreign-key actions, so `deck_cards` rows are
/// removed by the deck repository in the same unit of work as their deck.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS creatures (
    id BIGINT PRIMARY KEY,
    name VARCHAR NOT NULL,
    energy_type VARCHAR,
    hp INTEGER,
    image_url VARCHAR NOT NULL,
    regulation VARCHAR,
    expansion VARCHAR
);
CREATE TABLE IF NOT EXISTS trainers (
    id BIGINT PRIMARY KEY,
    name VARCHAR NOT NULL,
    trainer_type VARCHAR NOT NULL,
    description VARCHAR,
    image_url VARCHAR NOT NULL,
    regulation VARCHAR,
    expansion VARCHAR
);
CREATE TABLE IF NOT EXISTS energies (
    id BIGINT PRIMARY KEY,
    name VARCHAR NOT NULL,
    image_url VARCHAR NOT NULL,
    regulation VARCHAR,
    expansion VARCHAR
);
CREATE SEQUENCE IF NOT EXISTS deck_id_seq START 1;
CREATE TABLE IF NOT EXISTS decks (
    id BIGINT PRIMARY KEY DEFAULT nextval('deck_id_seq'),
    name VARCHAR NOT NULL,
    description VARCHAR,
    main_card_id BIGINT,
    main_card_category VARCHAR,
    sub_card_id BIGINT,
    sub_card_category VARCHAR
);
CREATE TABLE IF NOT EXISTS deck_cards (
    deck_id BIGINT NOT NULL,
    position INTEGER NOT NULL,
    card_id BIGINT NOT NULL,
    card_category VARCHAR NOT NULL,
    quantity INTEGER NOT NULL CHECK (quantity > 0)
);
";

/// Owns the DuckDB database holding the catalog and the decks.
///
/// The schema is created on open, so a fresh file or in-memory database is
/// immediately usable.
pub struct Connection {
    conn: DuckDbConnection,
    path: Option<PathBuf>,
}

impl Connection {
    /// Open (or create) a database file, creating parent directories.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let conn = DuckDbConnection::open(&path)?;
        eprintln!("Opened deck database: {}", path.display());
        Self::bootstrap(conn, Some(path))
    }

    /// Open a private in-memory database. Its contents vanish on drop.
    pub fn open_in_memory() -> Result<Self> {
        let conn = DuckDbConnection::open_in_memory()?;
        Self::bootstrap(conn, None)
    }

    fn bootstrap(conn: DuckDbConnection, path: Option<PathBuf>) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn, path })
    }

    /// The database file, or `None` when in memory.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Execute SQL and return results as a `Vec` of `HashMap`s.
    ///
    /// Each row is represented as a `HashMap<String, serde_json::Value>`.
    /// Automatically converts DuckDB types to `serde_json::Value`.
    pub fn execute(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let mut stmt = self.conn.prepare(sql)?;

        let param_values: Vec<&dyn ToSql> = params.iter().map(|p| p as &dyn ToSql).collect();

        let mut rows_result = stmt.query(param_values.as_slice())?;

        // Column metadata is only available once the query has run
        let column_names: Vec<String> = rows_result
            .as_ref()
            .map(|s| s.column_names().into_iter().map(|c| c.to_string()).collect())
            .unwrap_or_default();

        let mut out: Vec<HashMap<String, serde_json::Value>> = Vec::new();

        while let Some(row) = rows_result.next()? {
            let mut map = HashMap::with_capacity(column_names.len());
            for (i, col_name) in column_names.iter().enumerate() {
                map.insert(col_name.clone(), convert_value_ref(row.get_ref(i)?));
            }
            out.push(map);
        }

        Ok(out)
    }

    /// Execute SQL and deserialize each row into type `T`.
    pub fn execute_into<T: DeserializeOwned>(&self, sql: &str, params: &[Value]) -> Result<Vec<T>> {
        let rows = self.execute(sql, params)?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let value = serde_json::Value::Object(row.into_iter().collect());
            results.push(serde_json::from_value(value)?);
        }
        Ok(results)
    }

    /// Execute SQL and return the first column of the first row.
    ///
    /// Returns `None` if the result set is empty.
    pub fn execute_scalar(&self, sql: &str, params: &[Value]) -> Result<Option<serde_json::Value>> {
        let mut stmt = self.conn.prepare(sql)?;
        let param_values: Vec<&dyn ToSql> = params.iter().map(|p| p as &dyn ToSql).collect();

        let mut rows = stmt.query(param_values.as_slice())?;

        if let Some(row) = rows.next()? {
            Ok(Some(convert_value_ref(row.get_ref(0)?)))
        } else {
            Ok(None)
        }
    }

    /// Append the rows of a newline-delimited JSON file to an existing table.
    ///
    /// Columns are matched by name; keys missing from the file are stored as
    /// NULL. Returns the number of inserted rows.
    pub fn import_ndjson(&self, table_name: &str, ndjson_path: &str) -> Result<usize> {
        let path_fwd = ndjson_path.replace('\\', "/").replace('\'', "''");
        let inserted = self.conn.execute(
            &format!(
                "INSERT INTO {} BY NAME \
                 SELECT * FROM read_json_auto('{}', format='newline_delimited')",
                table_name, path_fwd
            ),
            [],
        )?;
        eprintln!("Imported {} rows into {}", inserted, table_name);
        Ok(inserted)
    }

    /// Start a unit of work. See [`UnitOfWork`].
    pub fn begin(&self) -> Result<UnitOfWork<'_>> {
        self.conn.execute_batch("BEGIN TRANSACTION")?;
        Ok(UnitOfWork {
            conn: &self.conn,
            finished: false,
        })
    }

    /// Access the underlying DuckDB connection for advanced usage.
    pub fn raw(&self) -> &DuckDbConnection {
        &self.conn
    }
}

// ---------------------------------------------------------------------------
// UnitOfWork
// ---------------------------------------------------------------------------

/// A database transaction that either commits as a whole or leaves no trace.
///
/// Nothing is visible to other readers until [`commit`](Self::commit)
/// succeeds. If the guard is dropped before that (an early `?` return, a
/// panic, a cancelled task), the transaction is rolled back.
pub struct UnitOfWork<'a> {
    conn: &'a DuckDbConnection,
    finished: bool,
}

impl<'a> UnitOfWork<'a> {
    /// Run a statement inside the transaction and return the affected row count.
    pub fn execute<P: Params>(&self, sql: &str, params: P) -> Result<usize> {
        Ok(self.conn.execute(sql, params)?)
    }

    /// Run an `INSERT ... RETURNING id` statement and return the id.
    pub fn insert_returning_id<P: Params>(&self, sql: &str, params: P) -> Result<i64> {
        Ok(self.conn.query_row(sql, params, |row| row.get::<_, i64>(0))?)
    }

    pub fn commit(mut self) -> Result<()> {
        self.finished = true;
        if let Err(e) = self.conn.execute_batch("COMMIT") {
            let _ = self.conn.execute_batch("ROLLBACK");
            return Err(DeckError::DuckDb(e));
        }
        Ok(())
    }

    pub fn rollback(mut self) -> Result<()> {
        self.finished = true;
        self.conn.execute_batch("ROLLBACK")?;
        Ok(())
    }
}

impl Drop for UnitOfWork<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        eprintln!("Unit of work dropped before commit; rolling back");
        if let Err(e) = self.conn.execute_batch("ROLLBACK") {
            eprintln!("Rollback failed: {}", e);
        }
    }
}

/// Convert a DuckDB `ValueRef` to a `serde_json::Value`.
fn convert_value_ref(val: ValueRef<'_>) -> serde_json::Value {
    match val {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Boolean(b) => serde_json::Value::Bool(b),
        ValueRef::TinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::SmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::Int(n) => serde_json::Value::Number(n.into()),
        ValueRef::BigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UTinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::USmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UBigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::HugeInt(n) => {
            // HugeInt may not fit in i64; fall back to a string
            if let Ok(i) = i64::try_from(n) {
                serde_json::Value::Number(i.into())
            } else {
                serde_json::Value::String(n.to_string())
            }
        }
        ValueRef::Float(f) => serde_json::Number::from_f64(f as f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Double(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(bytes) => serde_json::Value::String(String::from_utf8_lossy(bytes).to_string()),
        // Dates, lists, blobs and the like never appear in the deck schema
        _ => serde_json::Value::Null,
    }
}
