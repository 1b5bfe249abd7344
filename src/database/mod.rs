//! Thin access layer over a single SQLite connection.
//!
//! Every statement goes through [`Statement`], which carries its bound
//! parameters next to the SQL text. Table and column names cannot be bound,
//! so they pass through [`ident`] before being spliced into SQL.

pub mod schema;

use crate::error::{AppErr, Result};
use rusqlite::types::{Value, ValueRef};
use rusqlite::{Connection, OpenFlags, Transaction, TransactionBehavior, params_from_iter};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.params.push(value.into());
        self
    }
}

/// 한 행. 각 컬럼 값은 텍스트로 변환되며 NULL은 `None`.
pub type Row = Vec<Option<String>>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rows {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Rows {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens the database file. Without `create` a missing file is an error.
    pub fn open(path: &Path, create: bool) -> Result<Self> {
        let mut flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        if create {
            flags |= OpenFlags::SQLITE_OPEN_CREATE;
        }
        let conn = Connection::open_with_flags(path, flags)?;
        let db = Self::configure(conn)?;
        info!(path = %path.display(), "connected to database");
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::configure(Connection::open_in_memory()?)
    }

    fn configure(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        Ok(Self { conn })
    }

    /// Creates every table of the airline schema that does not exist yet.
    pub fn create_schema(&self) -> Result<()> {
        self.execute_batch(schema::AIRLINE)?;
        info!("airline schema ready");
        Ok(())
    }

    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// Runs an INSERT/UPDATE/DDL statement and returns the affected row count.
    pub fn execute_update(&self, stmt: &Statement) -> Result<usize> {
        debug!(sql = %stmt.sql, params = stmt.params.len(), "execute update");
        let changed = self
            .conn
            .execute(&stmt.sql, params_from_iter(stmt.params.iter()))?;
        Ok(changed)
    }

    pub fn execute_query(&self, stmt: &Statement) -> Result<Rows> {
        debug!(sql = %stmt.sql, params = stmt.params.len(), "execute query");
        let mut prepared = self.conn.prepare(&stmt.sql)?;
        let columns: Vec<String> = prepared
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();
        let width = columns.len();

        let mut out = Vec::new();
        let mut rows = prepared.query(params_from_iter(stmt.params.iter()))?;
        while let Some(row) = rows.next()? {
            let mut record = Vec::with_capacity(width);
            for i in 0..width {
                record.push(as_text(row.get_ref(i)?));
            }
            out.push(record);
        }
        Ok(Rows { columns, rows: out })
    }

    /// First column of the first row, or `None` for no rows or a NULL value.
    pub fn query_scalar(&self, stmt: &Statement) -> Result<Option<String>> {
        let rows = self.execute_query(stmt)?;
        Ok(rows
            .rows
            .into_iter()
            .next()
            .and_then(|row| row.into_iter().next())
            .flatten())
    }

    /// Number of result columns the statement would produce, without running it.
    pub fn column_count(&self, sql: &str) -> Result<usize> {
        Ok(self.conn.prepare(sql)?.column_count())
    }

    /// Starts a transaction on the shared connection. Dropping the guard
    /// without `commit` rolls it back.
    pub fn begin(&self, behavior: TransactionBehavior) -> Result<Transaction<'_>> {
        Ok(Transaction::new_unchecked(&self.conn, behavior)?)
    }

    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| AppErr::Sql(e))
    }
}

fn as_text(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(t) | ValueRef::Blob(t) => Some(String::from_utf8_lossy(t).into_owned()),
    }
}

/// Checks that `name` is a plain SQL identifier before it is spliced into SQL.
pub fn ident(name: &str) -> Result<&str> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        }
        _ => false,
    };
    if valid {
        Ok(name)
    } else {
        Err(AppErr::InvalidIdent(name.to_string()))
    }
}
