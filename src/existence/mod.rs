//! Foreign-key target lookups.
//!
//! The default mode answers "is there a row with `column = value`". The
//! column-count mode only reports whether the lookup query has a projection,
//! which is true for every well-formed lookup. It exists for parity with old
//! data-entry sessions and must be enabled explicitly.

use crate::database::{Database, Statement, ident};
use crate::error::Result;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExistenceMode {
    #[default]
    RowCount,
    /// Reports the result column count, not whether a row matched.
    ColumnCountCompat,
}

/// A value that must already exist in `table.column`.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub table: String,
    pub column: String,
    pub value: Value,
}

impl Reference {
    pub fn new(table: &str, column: &str, value: impl Into<Value>) -> Self {
        Self {
            table: table.to_string(),
            column: column.to_string(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExistenceChecker {
    mode: ExistenceMode,
}

impl ExistenceChecker {
    pub fn new(mode: ExistenceMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ExistenceMode {
        self.mode
    }

    pub fn exists(
        &self,
        db: &Database,
        table: &str,
        column: &str,
        value: impl Into<Value>,
    ) -> Result<bool> {
        let (table, column) = (ident(table)?, ident(column)?);
        let found = match self.mode {
            ExistenceMode::RowCount => {
                let sql = format!("SELECT 1 FROM {table} WHERE {column} = ?1 LIMIT 1");
                let rows = db.execute_query(&Statement::new(sql).bind(value))?;
                !rows.is_empty()
            }
            ExistenceMode::ColumnCountCompat => {
                let sql = format!("SELECT {column} FROM {table} WHERE {column} = ?1");
                let count = db.column_count(&sql)?;
                warn!(table, column, count, "existence check answered by column count");
                count > 0
            }
        };
        debug!(table, column, found, "existence check");
        Ok(found)
    }

    pub fn check(&self, db: &Database, reference: &Reference) -> Result<bool> {
        self.exists(
            db,
            &reference.table,
            &reference.column,
            reference.value.clone(),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::AppErr;

    fn db_with_flight(fnum: i64) -> Database {
        let db = Database::open_in_memory().unwrap();
        db.create_schema().unwrap();
        db.execute_update(
            &Statement::new(
                "INSERT INTO Flight VALUES (?1, 300, 10, 0, '2024-05-01', '2024-05-01', 'LAX', 'SFO')",
            )
            .bind(fnum),
        )
        .unwrap();
        db
    }

    #[test]
    fn test_row_count_mode_finds_existing_row() {
        let db = db_with_flight(4);
        let checker = ExistenceChecker::default();
        assert!(checker.exists(&db, "Flight", "fnum", 4).unwrap());
    }

    #[test]
    fn test_row_count_mode_missing_row_is_false() {
        let db = db_with_flight(4);
        let checker = ExistenceChecker::default();
        assert!(!checker.exists(&db, "Flight", "fnum", 5).unwrap());
        assert!(!checker.exists(&db, "Pilot", "id", 0).unwrap());
    }

    #[test]
    fn test_text_value_compares_by_value() {
        let db = db_with_flight(4);
        let checker = ExistenceChecker::default();
        assert!(checker.exists(&db, "Flight", "arrival_airport", "LAX".to_string()).unwrap());
        assert!(!checker.exists(&db, "Flight", "arrival_airport", "' OR '1'='1".to_string()).unwrap());
    }

    // 호환 모드는 행이 없어도 true를 돌려준다. 알려진 결함을 그대로 재현하는지 확인.
    #[test]
    fn test_column_count_compat_reports_missing_row_as_present() {
        let db = db_with_flight(4);
        let compat = ExistenceChecker::new(ExistenceMode::ColumnCountCompat);
        assert!(compat.exists(&db, "Flight", "fnum", 4).unwrap());
        assert!(compat.exists(&db, "Flight", "fnum", 999).unwrap());
        let fixed = ExistenceChecker::new(ExistenceMode::RowCount);
        assert!(!fixed.exists(&db, "Flight", "fnum", 999).unwrap());
    }

    #[test]
    fn test_unknown_table_is_sql_error() {
        let db = db_with_flight(4);
        match ExistenceChecker::default().exists(&db, "Hangar", "id", 1) {
            Err(AppErr::Sql(_)) => (),
            other => panic!("Expected Sql error, got {other:?}"),
        }
    }

    #[test]
    fn test_check_reference() {
        let db = db_with_flight(2);
        let checker = ExistenceChecker::default();
        assert!(checker.check(&db, &Reference::new("Flight", "fnum", 2)).unwrap());
        assert!(!checker.check(&db, &Reference::new("Flight", "fnum", 3)).unwrap());
    }
}
