//! Primary key allocation.
//!
//! [`ScanAllocator`] reads `MAX(column) + 1` and is what the menu workflows
//! have always used. It is racy when two writers allocate at the same time.
//! [`SequenceAllocator`] keeps a persistent counter per `table.column` and
//! bumps it inside an immediate transaction, so a value is handed out once.

use crate::database::{Database, Statement, ident, schema};
use crate::error::{AppErr, Result};
use rusqlite::TransactionBehavior;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub trait IdAllocator {
    fn next_id(&self, db: &Database, table: &str, column: &str) -> Result<i64>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    #[default]
    Scan,
    Sequence,
}

impl IdStrategy {
    pub fn allocator(self) -> Box<dyn IdAllocator> {
        match self {
            IdStrategy::Scan => Box::new(ScanAllocator),
            IdStrategy::Sequence => Box::new(SequenceAllocator),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScanAllocator;

impl IdAllocator for ScanAllocator {
    fn next_id(&self, db: &Database, table: &str, column: &str) -> Result<i64> {
        let sql = format!("SELECT MAX({}) FROM {}", ident(column)?, ident(table)?);
        let next = match db.query_scalar(&Statement::new(sql))? {
            // 빈 테이블
            None => 0,
            Some(raw) => successor(table, column, parse_id(table, column, &raw)?)?,
        };
        debug!(table, column, next, "scan allocated id");
        Ok(next)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceAllocator;

impl SequenceAllocator {
    fn key(table: &str, column: &str) -> Result<String> {
        Ok(format!("{}.{}", ident(table)?, ident(column)?))
    }
}

impl IdAllocator for SequenceAllocator {
    fn next_id(&self, db: &Database, table: &str, column: &str) -> Result<i64> {
        let key = Self::key(table, column)?;
        db.execute_batch(schema::ID_SEQUENCE)?;

        let tx = db.begin(TransactionBehavior::Immediate)?;
        let stored = db.query_scalar(
            &Statement::new("SELECT next_value FROM id_sequence WHERE name = ?1").bind(key.clone()),
        )?;
        // 시퀀스를 거치지 않고 들어온 행이 있어도 충돌하지 않도록 스캔 값과 비교
        let floor = ScanAllocator.next_id(db, table, column)?;
        let next = match stored {
            Some(raw) => parse_id("id_sequence", "next_value", &raw)?.max(floor),
            None => floor,
        };
        db.execute_update(
            &Statement::new(
                "INSERT INTO id_sequence (name, next_value) VALUES (?1, ?2) \
                 ON CONFLICT (name) DO UPDATE SET next_value = excluded.next_value",
            )
            .bind(key.clone())
            .bind(successor("id_sequence", "next_value", next)?),
        )?;
        tx.commit()?;
        debug!(sequence = %key, next, "sequence allocated id");
        Ok(next)
    }
}

fn parse_id(table: &str, column: &str, raw: &str) -> Result<i64> {
    raw.trim().parse::<i64>().map_err(|_| AppErr::Format {
        table: table.to_string(),
        column: column.to_string(),
        value: raw.to_string(),
    })
}

/// `id + 1`, or a Format error once the column has run out of integers.
fn successor(table: &str, column: &str, id: i64) -> Result<i64> {
    id.checked_add(1).ok_or_else(|| AppErr::Format {
        table: table.to_string(),
        column: column.to_string(),
        value: id.to_string(),
    })
}
