//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! two tables: `deliveries` and `deductions`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{DeductionRow, DeliveryRow, OutputResult};

/// Writes run output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS deliveries (
                 passenger_id    INTEGER PRIMARY KEY,
                 injection_time  REAL    NOT NULL,
                 delivery_time   REAL    NOT NULL,
                 start_floor     INTEGER NOT NULL,
                 start_hallway   TEXT    NOT NULL,
                 end_floor       INTEGER NOT NULL,
                 end_hallway     TEXT    NOT NULL,
                 satisfaction    REAL    NOT NULL,
                 deduction_count INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS deductions (
                 passenger_id INTEGER NOT NULL,
                 time         REAL    NOT NULL,
                 factor       REAL    NOT NULL,
                 reason       TEXT    NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_deliveries(&mut self, rows: &[DeliveryRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO deliveries \
                 (passenger_id, injection_time, delivery_time, start_floor, start_hallway, \
                  end_floor, end_hallway, satisfaction, deduction_count) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.passenger_id,
                    row.injection_time,
                    row.delivery_time,
                    row.start_floor,
                    row.start_hallway.as_str(),
                    row.end_floor,
                    row.end_hallway.as_str(),
                    row.satisfaction,
                    row.deduction_count,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_deductions(&mut self, rows: &[DeductionRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO deductions (passenger_id, time, factor, reason) \
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![row.passenger_id, row.time, row.factor, row.reason])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
